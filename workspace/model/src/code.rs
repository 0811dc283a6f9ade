//! Dotted numeric account codes such as `4.1.2`.
//!
//! A code encodes the position of an account in the chart: the number of steps
//! is the depth, and dropping the last step yields the parent's code.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Highest value a single step may take.
pub const MAX_STEP: u16 = 999;

/// Error returned when a string is not a valid code.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodeError {
    #[error("Invalid code")]
    Empty,
    #[error("Code must be composed only by integers, got '{0}'")]
    NotNumeric(String),
    #[error("Code step value {0} exceeds {MAX_STEP}")]
    StepTooLarge(u32),
}

/// A validated account code.
///
/// The text is kept exactly as written, so `"01"` and `"1"` are distinct codes.
/// Equality and ordering follow that string form, so `"10"` sorts before `"9"`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Code {
    steps: Vec<u16>,
    text: String,
}

impl Code {
    /// Parses a dotted code, failing on empty input, non-decimal steps or any
    /// step above [`MAX_STEP`].
    pub fn parse(text: &str) -> Result<Self, CodeError> {
        if text.is_empty() {
            return Err(CodeError::Empty);
        }

        let steps = text
            .split('.')
            .map(parse_step)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            steps,
            text: text.to_string(),
        })
    }

    /// Non-failing probe around [`Code::parse`].
    pub fn is_valid(text: &str) -> bool {
        Self::parse(text).is_ok()
    }

    /// Builds a code from raw steps, written without leading zeros.
    pub fn from_steps(steps: &[u16]) -> Result<Self, CodeError> {
        if steps.is_empty() {
            return Err(CodeError::Empty);
        }
        if let Some(step) = steps.iter().find(|step| **step > MAX_STEP) {
            return Err(CodeError::StepTooLarge(u32::from(*step)));
        }
        let text = steps
            .iter()
            .map(u16::to_string)
            .collect::<Vec<_>>()
            .join(".");
        Ok(Self {
            steps: steps.to_vec(),
            text,
        })
    }

    pub fn steps(&self) -> &[u16] {
        &self.steps
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Number of steps, which is also the depth of the owning account.
    pub fn depth(&self) -> usize {
        self.steps.len()
    }

    pub fn last_step(&self) -> u16 {
        // steps is never empty
        self.steps[self.steps.len() - 1]
    }

    /// Text before the last dot, or `None` for a top-level code.
    fn prefix(&self) -> Option<&str> {
        self.text.rfind('.').map(|dot| &self.text[..dot])
    }

    /// The code with its last step removed, or `None` for a top-level code.
    pub fn parent(&self) -> Option<Code> {
        let prefix = self.prefix()?;
        Some(Self {
            steps: self.steps[..self.steps.len() - 1].to_vec(),
            text: prefix.to_string(),
        })
    }

    /// Appends `step` as a new trailing step.
    pub fn child(&self, step: u32) -> Result<Code, CodeError> {
        let step = checked_step(step)?;
        let mut steps = self.steps.clone();
        steps.push(step);
        Ok(Self {
            steps,
            text: format!("{}.{}", self.text, step),
        })
    }

    /// Replaces the trailing step with `step`, keeping the leading steps as written.
    pub fn with_last_step(&self, step: u32) -> Result<Code, CodeError> {
        let step = checked_step(step)?;
        let mut steps = self.steps.clone();
        let last = steps.len() - 1;
        steps[last] = step;
        let text = match self.prefix() {
            Some(prefix) => format!("{}.{}", prefix, step),
            None => step.to_string(),
        };
        Ok(Self { steps, text })
    }

    /// The code with its dots stripped, read as one integer (`"1.10"` is 110,
    /// `"1.01"` is 101).
    ///
    /// Codes of different depths share this number space. Returns `None` when
    /// the digits do not fit in a `u128`.
    pub fn flattened(&self) -> Option<u128> {
        let digits: String = self.text.chars().filter(|c| *c != '.').collect();
        digits.parse::<u128>().ok()
    }
}

fn parse_step(step: &str) -> Result<u16, CodeError> {
    if step.is_empty() || !step.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CodeError::NotNumeric(step.to_string()));
    }
    // Digits only, so a parse failure means overflow.
    let value = step
        .parse::<u32>()
        .map_err(|_| CodeError::StepTooLarge(u32::MAX))?;
    checked_step(value)
}

fn checked_step(value: u32) -> Result<u16, CodeError> {
    if value > u32::from(MAX_STEP) {
        return Err(CodeError::StepTooLarge(value));
    }
    Ok(value as u16)
}

impl FromStr for Code {
    type Err = CodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Code::parse(s)
    }
}

impl TryFrom<&str> for Code {
    type Error = CodeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Code::parse(value)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<Code> for String {
    fn from(code: Code) -> Self {
        code.text
    }
}

impl PartialOrd for Code {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Code {
    fn cmp(&self, other: &Self) -> Ordering {
        self.text.cmp(&other.text)
    }
}
