//! Parsing of the `startX,startY,endX,endY` route argument.

use gridstar_core::CellCoord;
use thiserror::Error;

const FIELD_DELIMITER: char = ',';
const FIELD_NAMES: [&str; 4] = ["startX", "startY", "endX", "endY"];

/// Start and goal cells requested on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Route {
    /// Cell the search starts from.
    pub(crate) start: CellCoord,
    /// Cell the search tries to reach.
    pub(crate) goal: CellCoord,
}

/// Errors raised while parsing a route argument.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub(crate) enum CoordinateError {
    /// The argument did not contain exactly four fields.
    #[error("expected 4 comma-separated coordinates, found {found}")]
    FieldCount {
        /// Number of fields present in the argument.
        found: usize,
    },
    /// A field was not a non-negative integer.
    #[error("{field} must be a non-negative integer (received '{value}')")]
    InvalidField {
        /// Name of the offending field.
        field: &'static str,
        /// Raw text of the offending field.
        value: String,
    },
}

/// Parses `startX,startY,endX,endY` into a route.
pub(crate) fn parse_route(value: &str) -> Result<Route, CoordinateError> {
    let fields: Vec<&str> = value.split(FIELD_DELIMITER).collect();
    if fields.len() != FIELD_NAMES.len() {
        return Err(CoordinateError::FieldCount {
            found: fields.len(),
        });
    }

    let mut numbers = [0_u32; 4];
    for ((slot, raw), field) in numbers.iter_mut().zip(&fields).zip(FIELD_NAMES) {
        *slot = raw
            .trim()
            .parse::<u32>()
            .map_err(|_| CoordinateError::InvalidField {
                field,
                value: raw.trim().to_owned(),
            })?;
    }

    let [start_x, start_y, end_x, end_y] = numbers;
    Ok(Route {
        start: CellCoord::new(start_x, start_y),
        goal: CellCoord::new(end_x, end_y),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_four_fields_with_whitespace() {
        assert_eq!(
            parse_route(" 1, 2 ,30,4"),
            Ok(Route {
                start: CellCoord::new(1, 2),
                goal: CellCoord::new(30, 4),
            })
        );
    }

    #[test]
    fn rejects_wrong_field_count() {
        assert_eq!(
            parse_route("1,2,3"),
            Err(CoordinateError::FieldCount { found: 3 })
        );
        assert_eq!(
            parse_route("1,2,3,4,5"),
            Err(CoordinateError::FieldCount { found: 5 })
        );
    }

    #[test]
    fn rejects_negative_and_non_numeric_fields() {
        assert_eq!(
            parse_route("0,-1,2,2"),
            Err(CoordinateError::InvalidField {
                field: "startY",
                value: "-1".to_owned(),
            })
        );

        let error = parse_route("0,0,x,2").expect_err("x is not a number");
        assert_eq!(
            error.to_string(),
            "endX must be a non-negative integer (received 'x')"
        );
    }
}
