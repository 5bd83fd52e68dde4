//! Move generators for each card kind.
//!
//! Every generator scans pawns row-major and directions in a fixed order, so
//! the move list (and therefore every move index) is deterministic for a given
//! board. Each move ends with a ball shift toward the opponent.

use super::CardKind;
use super::effect::{CardMove, Effect};
use crate::board::Board;
use crate::tile::{BOARD_SIZE, Tile};
use crate::types::{Occupant, Side};
use std::collections::HashSet;

const ORTHOGONAL: [(i8, i8); 4] = [(-1, 0), (0, 1), (1, 0), (0, -1)];
const DIAGONAL: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, 1), (1, -1)];
const HORIZONTAL: [(i8, i8); 2] = [(0, -1), (0, 1)];
const KNIGHT_HOPS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, 2),
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
];
const LAST_ROW: u8 = BOARD_SIZE - 1;

pub(super) fn generate(kind: CardKind, board: &Board, side: Side) -> Vec<CardMove> {
    let mut moves = match kind {
        CardKind::Knife => strike_adjacent(kind, board, side, &ORTHOGONAL),
        CardKind::Dagger => strike_adjacent(kind, board, side, &DIAGONAL),
        CardKind::Charge => charge(board, side),
        CardKind::Bishop => bishop(board, side),
        CardKind::Fire => fire(board, side),
        CardKind::SideStep => side_step(board, side),
        CardKind::Jump => jump(board, side),
        CardKind::Tank => tank(board, side),
        CardKind::Kamikaze => kamikaze(board, side),
        CardKind::Spawn => spawn(board, side),
        CardKind::Peace => peace(board, side),
        CardKind::Knight => knight(board, side),
        CardKind::Scare => scare(board, side),
    };
    let mut seen = HashSet::new();
    moves.retain(|mv| seen.insert(mv.effects.clone()));
    moves
}

fn card_move(
    side: Side,
    tile_marker_1: Tile,
    tile_marker_2: Option<Tile>,
    mut effects: Vec<Effect>,
    description: String,
) -> CardMove {
    effects.push(Effect::ShiftBall {
        toward: side.opponent(),
    });
    CardMove::new(tile_marker_1, tile_marker_2, effects, description)
}

fn relocation(kind: CardKind, side: Side, from: Tile, to: Tile) -> CardMove {
    card_move(
        side,
        from,
        Some(to),
        vec![Effect::Relocate { from, to }],
        format!("{}: {from} -> {to}", kind.name()),
    )
}

/// Vacant tiles along a ray from `from`, stopping before the first pawn.
fn slide(board: &Board, from: Tile, (d_row, d_col): (i8, i8)) -> impl Iterator<Item = Tile> + '_ {
    std::iter::successors(from.offset(d_row, d_col), move |tile| tile.offset(d_row, d_col))
        .take_while(move |&tile| board.is_vacant(tile))
}

fn strike_adjacent(kind: CardKind, board: &Board, side: Side, offsets: &[(i8, i8)]) -> Vec<CardMove> {
    let enemy = Occupant::Pawn(side.opponent());
    board
        .pawns(side)
        .flat_map(|pawn| offsets.iter().filter_map(move |&(dr, dc)| pawn.offset(dr, dc)))
        .filter(|&victim| board.occupant_at(victim) == enemy)
        .map(|victim| {
            card_move(
                side,
                victim,
                None,
                vec![Effect::Remove { tile: victim }],
                format!("{}: remove {victim}", kind.name()),
            )
        })
        .collect()
}

fn charge(board: &Board, side: Side) -> Vec<CardMove> {
    let step = side.forward();
    let mut moves = Vec::new();
    for pawn in board.pawns(side) {
        let mut target = pawn.offset(2 * step, 0);
        while let Some(tile) = target {
            if tile.row() == 0 || tile.row() == LAST_ROW || !board.is_vacant(tile) {
                break;
            }
            moves.push(relocation(CardKind::Charge, side, pawn, tile));
            target = tile.offset(step, 0);
        }
    }
    moves
}

fn bishop(board: &Board, side: Side) -> Vec<CardMove> {
    board
        .pawns(side)
        .flat_map(|pawn| {
            DIAGONAL.iter().flat_map(move |&dir| {
                slide(board, pawn, dir)
                    .take_while(move |tile| tile.row() != side.goal_row())
                    .map(move |to| relocation(CardKind::Bishop, side, pawn, to))
            })
        })
        .collect()
}

fn fire(board: &Board, side: Side) -> Vec<CardMove> {
    side.own_half()
        .into_iter()
        .filter(|&row| !board.row_is_vacant(row))
        .filter_map(|row| {
            let marker = Tile::from_indices(row as usize, 0)?;
            let effects = Tile::row_tiles(row)
                .filter(|&tile| !board.is_vacant(tile))
                .map(|tile| Effect::Remove { tile })
                .collect();
            Some(card_move(
                side,
                marker,
                None,
                effects,
                format!("{}: burn row {}", CardKind::Fire.name(), row + 1),
            ))
        })
        .collect()
}

fn side_step(board: &Board, side: Side) -> Vec<CardMove> {
    board
        .pawns(side)
        .flat_map(|pawn| {
            HORIZONTAL.iter().flat_map(move |&dir| {
                slide(board, pawn, dir).map(move |to| relocation(CardKind::SideStep, side, pawn, to))
            })
        })
        .collect()
}

fn jump(board: &Board, side: Side) -> Vec<CardMove> {
    board
        .pawns(side)
        .filter_map(|pawn| {
            let to = pawn.offset(2 * side.forward(), 0)?;
            board
                .is_vacant(to)
                .then(|| relocation(CardKind::Jump, side, pawn, to))
        })
        .collect()
}

fn tank(board: &Board, side: Side) -> Vec<CardMove> {
    let mut moves = Vec::new();
    for pawn in board.pawns(side) {
        for (dr, dc) in ORTHOGONAL {
            let Some(pushed) = pawn.offset(dr, dc) else {
                continue;
            };
            let Some(landing) = pushed.offset(dr, dc) else {
                continue;
            };
            if board.is_vacant(pushed) || !board.is_vacant(landing) {
                continue;
            }
            moves.push(card_move(
                side,
                pawn,
                Some(pushed),
                vec![
                    Effect::Relocate {
                        from: pushed,
                        to: landing,
                    },
                    Effect::Relocate {
                        from: pawn,
                        to: pushed,
                    },
                ],
                format!(
                    "{}: {pawn} -> {pushed}, shoving {pushed} -> {landing}",
                    CardKind::Tank.name()
                ),
            ));
        }
    }
    moves
}

fn kamikaze(board: &Board, side: Side) -> Vec<CardMove> {
    let enemy = Occupant::Pawn(side.opponent());
    let mut moves = Vec::new();
    for pawn in board.pawns(side) {
        for (dr, dc) in ORTHOGONAL.into_iter().chain(DIAGONAL) {
            let first_hit = std::iter::successors(pawn.offset(dr, dc), |tile| tile.offset(dr, dc))
                .find(|&tile| !board.is_vacant(tile));
            if let Some(target) = first_hit.filter(|&tile| board.occupant_at(tile) == enemy) {
                moves.push(card_move(
                    side,
                    pawn,
                    Some(target),
                    vec![Effect::Remove { tile: pawn }, Effect::Remove { tile: target }],
                    format!("{}: {pawn} takes out {target}", CardKind::Kamikaze.name()),
                ));
            }
        }
    }
    moves
}

fn spawn(board: &Board, side: Side) -> Vec<CardMove> {
    side.own_half()
        .into_iter()
        .flat_map(Tile::row_tiles)
        .filter(|&tile| board.is_vacant(tile))
        .map(|tile| {
            card_move(
                side,
                tile,
                None,
                vec![Effect::Place { tile, side }],
                format!("{}: new pawn on {tile}", CardKind::Spawn.name()),
            )
        })
        .collect()
}

/// Pawns of `side` furthest from its home row.
fn front_line(board: &Board, side: Side) -> Vec<Tile> {
    let Some(best) = board.pawns(side).map(|tile| side.advancement(tile.row())).max() else {
        return Vec::new();
    };
    board
        .pawns(side)
        .filter(|tile| side.advancement(tile.row()) == best)
        .collect()
}

fn peace(board: &Board, side: Side) -> Vec<CardMove> {
    let theirs = front_line(board, side.opponent());
    front_line(board, side)
        .into_iter()
        .flat_map(|own| {
            theirs.iter().map(move |&other| {
                card_move(
                    side,
                    own,
                    Some(other),
                    vec![Effect::Remove { tile: own }, Effect::Remove { tile: other }],
                    format!("{}: {own} and {other} leave the board", CardKind::Peace.name()),
                )
            })
        })
        .collect()
}

fn knight(board: &Board, side: Side) -> Vec<CardMove> {
    board
        .pawns(side)
        .flat_map(|pawn| {
            KNIGHT_HOPS
                .iter()
                .filter_map(move |&(dr, dc)| pawn.offset(dr, dc))
                .filter(|&to| board.is_vacant(to))
                .map(move |to| relocation(CardKind::Knight, side, pawn, to))
        })
        .collect()
}

fn scare(board: &Board, side: Side) -> Vec<CardMove> {
    let enemy = side.opponent();
    board
        .pawns(enemy)
        .filter_map(|pawn| {
            let home = Tile::from_indices(enemy.home_row() as usize, pawn.col() as usize)?;
            board
                .is_vacant(home)
                .then(|| relocation(CardKind::Scare, side, pawn, home))
        })
        .collect()
}
