// =============================================================================
// Tile numbering
//
// The 32 dark squares are numbered 1..=32 row by row from the top edge
// (y = 0). Even rows hold their dark squares on odd columns, odd rows on even
// columns. Coordinates are (x, y) with x the column.
// =============================================================================

use crate::piece::Color;

pub const TILE_COUNT: u8 = 32;

pub fn is_valid_tile(tile: u8) -> bool {
    (1..=TILE_COUNT).contains(&tile)
}

/// Column and row of a tile. With `Some(Color::Black)` the result is seen from
/// Black's side of the table, i.e. rotated by 180°.
///
/// Panics for tiles outside `1..=32`.
pub fn tile_to_coord(tile: u8, perspective: Option<Color>) -> (usize, usize) {
    assert!(is_valid_tile(tile), "tile {tile} out of range");
    let index = (tile - 1) as usize;
    let y = index / 4;
    let mut x = (index % 4) * 2;
    if y % 2 == 0 {
        x += 1;
    }
    match perspective {
        Some(Color::Black) => (7 - x, 7 - y),
        _ => (x, y),
    }
}

/// Tile id of a dark square, `None` for light squares and anything off the board.
pub fn coord_to_tile(x: usize, y: usize) -> Option<u8> {
    if x >= 8 || y >= 8 || (x + y) % 2 == 0 {
        return None;
    }
    Some((y * 4 + x / 2 + 1) as u8)
}

/// Signed variant used while walking diagonals.
pub(crate) fn offset(x: usize, y: usize, dx: i32, dy: i32) -> Option<(usize, usize)> {
    let nx = x as i32 + dx;
    let ny = y as i32 + dy;
    if (0..8).contains(&nx) && (0..8).contains(&ny) {
        Some((nx as usize, ny as usize))
    } else {
        None
    }
}
