use crate::error::Docx2XlsxError;
use crate::mapping::config::ConfigError;
use thiserror::Error;

/// Separator of a closed interval, `1~3`
const INTERVAL: char = '~';
/// Separator of a discrete list, `3,5,10`
const LIST: char = ',';
/// Marks the step of an open-ended sequence, `1,+2`
const STEP: char = '+';

/// Errors related to range expression parsing.
#[derive(Error, Debug)]
pub enum RangeError {
    #[error("Invalid number '{token}' in range '{expression}'")]
    FormatError { expression: String, token: String },

    #[error("Step of range '{0}' must be positive")]
    StepError(String),
}

/// Parses a range expression into the ordered column indexes it names.
///
/// * `1~3` - closed interval, `[1, 2, 3]`; a reversed interval is empty
/// * `3,5,10` - discrete list, order kept as written
/// * `1,+2` - base and step, `[1, 3, 5, ...]` while `<= end`
/// * `7` - single index
///
/// `end` is only consulted by the open-ended form and must be at least 1 there.
pub fn parse_range(expression: &str, end: Option<usize>) -> Result<Vec<usize>, Docx2XlsxError> {
    if let Some((from, to)) = expression.split_once(INTERVAL) {
        let from = parse_index(expression, from)?;
        let to = parse_index(expression, to)?;
        Ok((from..=to).collect())
    } else if let Some((base, _)) = expression.split_once(LIST) {
        if let Some((_, step)) = expression.split_once(STEP) {
            let end = end
                .filter(|end| *end >= 1)
                .ok_or_else(|| ConfigError::OpenRangeWithoutEnd(expression.to_owned()))?;
            let base = parse_index(expression, base)?;
            let step = parse_index(expression, step)?;
            if step == 0 {
                Err(RangeError::StepError(expression.to_owned()))?;
            }
            Ok((base..=end).step_by(step).collect())
        } else {
            expression
                .split(LIST)
                .map(|token| parse_index(expression, token))
                .collect()
        }
    } else {
        Ok(vec![parse_index(expression, expression)?])
    }
}

fn parse_index(expression: &str, token: &str) -> Result<usize, Docx2XlsxError> {
    token.trim().parse().map_err(|_| {
        RangeError::FormatError {
            expression: expression.to_owned(),
            token: token.to_owned(),
        }
        .into()
    })
}
