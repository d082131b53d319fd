//! Coordinate block reading
//!
//! A block is a point-count line followed by up to that many `x y` lines.

use crate::constants::ngi_tokens::BLOCK_TERMINATORS;
use crate::cursor::LineCursor;
use crate::models::Point;

/// Points read from one coordinate block
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoordinateBlock {
    pub points: Vec<Point>,

    /// Point count declared by the block, if the count line was valid
    pub declared: Option<usize>,

    /// 1-based numbers of coordinate lines that were skipped
    pub rejected_lines: Vec<usize>,
}

impl CoordinateBlock {
    /// True when fewer points were read than declared
    pub fn is_short(&self) -> bool {
        self.declared.is_some_and(|declared| self.points.len() < declared)
    }
}

/// Parse the coordinate block starting at `start`.
///
/// Returns the block and the index of the first line after it.
pub fn parse_coordinates(lines: &[String], start: usize) -> (CoordinateBlock, usize) {
    let mut cursor = LineCursor::at(lines, start);
    let block = read_block(&mut cursor);
    (block, cursor.position())
}

/// Read a coordinate block at the cursor.
///
/// The block ends after the declared number of lines, or earlier at a blank
/// line, a `$` token or a geometry keyword, which is left unconsumed. Lines
/// that are not two floats use up their slot but add no point. An invalid
/// count line is consumed and yields an empty block.
pub(crate) fn read_block(cursor: &mut LineCursor<'_>) -> CoordinateBlock {
    let mut block = CoordinateBlock::default();

    let Some(count_line) = cursor.peek() else {
        return block;
    };
    if is_block_terminator(count_line) {
        return block;
    }
    cursor.advance(1);

    let Ok(declared) = count_line.parse::<usize>() else {
        return block;
    };
    block.declared = Some(declared);
    let remaining = cursor.lines().len() - cursor.position();
    block.points.reserve(declared.min(remaining));

    for _ in 0..declared {
        let Some(line) = cursor.peek() else {
            break;
        };
        if is_block_terminator(line) {
            break;
        }

        match parse_coordinate_line(line) {
            Some(point) => block.points.push(point),
            None => block.rejected_lines.push(cursor.line_number()),
        }
        cursor.advance(1);
    }

    block
}

/// Parse a line of exactly two whitespace-separated floats
pub fn parse_coordinate_line(line: &str) -> Option<Point> {
    let mut parts = line.split_whitespace();
    let x = parts.next()?.parse::<f64>().ok()?;
    let y = parts.next()?.parse::<f64>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Point::new(x, y))
}

/// Lines that can never be part of a coordinate block
pub(crate) fn is_block_terminator(line: &str) -> bool {
    line.is_empty() || line.starts_with('$') || BLOCK_TERMINATORS.contains(&line)
}
