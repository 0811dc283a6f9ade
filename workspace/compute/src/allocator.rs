//! Next-code allocation for new accounts.
//!
//! A new child normally takes the smallest free slot among its siblings. When a
//! level is saturated (the next slot would reach [`MAX_STEP`]) allocation climbs
//! to the grandparent level and looks for a free sibling slot there instead.

use model::entities::account;
use model::{Code, MAX_STEP};
use tracing::{debug, instrument, trace, warn};

use crate::error::{ChartError, Result};
use crate::tree::AccountTree;

/// Finds the next free number in `numbers`.
///
/// Scanning starts at the smallest present value: the first adjacent pair
/// `(a, b)` with `b != a + 1` yields `a + 1`, otherwise `max + 1`. A gap below
/// the smallest value (e.g. a missing `1`) is not reported. Returns `Ok(None)`
/// for an empty input and `CodeSpaceExhausted` when `max + 1` overflows.
pub fn smallest_missing(numbers: &[u128]) -> Result<Option<u128>> {
    let mut sorted = numbers.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    // Values are strictly increasing after dedup, so a + 1 cannot overflow here.
    for pair in sorted.windows(2) {
        if pair[1] != pair[0] + 1 {
            return Ok(Some(pair[0] + 1));
        }
    }

    match sorted.last() {
        Some(max) => max
            .checked_add(1)
            .map(Some)
            .ok_or(ChartError::CodeSpaceExhausted(*max)),
        None => Ok(None),
    }
}

/// Computes the code for a new child of the account coded `parent_code`, whose
/// direct children currently hold `siblings`.
///
/// `tree` is only consulted when the level is saturated, to find the ancestor
/// one level up and its children.
#[instrument(skip(tree, siblings), fields(parent_code = %parent_code, siblings = siblings.len()))]
pub fn next_code(tree: &AccountTree, parent_code: &Code, siblings: Vec<Code>) -> Result<Code> {
    let mut parent_code = parent_code.clone();
    let mut siblings = siblings;

    loop {
        let last_steps: Vec<u128> = siblings.iter().map(|c| u128::from(c.last_step())).collect();
        let Some(next) = smallest_missing(&last_steps)? else {
            trace!("No siblings under {}, starting at 1", parent_code);
            return Ok(parent_code.child(1)?);
        };

        if next < u128::from(MAX_STEP) {
            // next - 1 is always one of the last steps, so the predecessor exists.
            let next = next as u32;
            let code = match siblings
                .iter()
                .find(|c| u32::from(c.last_step()) == next - 1)
            {
                Some(predecessor) => predecessor.with_last_step(next)?,
                None => parent_code.child(next)?,
            };
            debug!("Next code under {} is {}", parent_code, code);
            return Ok(code);
        }

        debug!("Level under {} is saturated, climbing one level", parent_code);
        let ancestor = parent_code
            .parent()
            .and_then(|ancestor_code| tree.find_by_code(&ancestor_code));

        match ancestor {
            Some(ancestor) => {
                siblings = tree.child_codes(ancestor.id)?;
                parent_code = ancestor.code()?;
            }
            None => {
                // Restarts at the saturated level.
                warn!(
                    "No ancestor account above {}, restarting allocation at step 1",
                    parent_code
                );
                return Ok(parent_code.child(1)?);
            }
        }
    }
}

/// Computes the next code for a new child of `parent`.
pub fn next_child_code(tree: &AccountTree, parent: &account::Model) -> Result<Code> {
    let parent_code = parent.code()?;
    let siblings = tree.child_codes(parent.id)?;
    next_code(tree, &parent_code, siblings)
}

/// Suggests the next top-level code.
///
/// Every code in the chart is flattened into one integer (`"1.10"` becomes 110)
/// and the smallest missing number over that set is returned. Codes of
/// different depths therefore share a single number space, and the result is
/// not guaranteed to be a valid [`Code`]. Codes too long to fit in a `u128`
/// are left out, as they can never equal the suggestion.
#[instrument(skip(tree), fields(accounts = tree.len()))]
pub fn next_root_number(tree: &AccountTree) -> Result<u128> {
    let mut numbers = Vec::with_capacity(tree.len());
    for account in tree.iter() {
        match account.code()?.flattened() {
            Some(number) => numbers.push(number),
            None => debug!("Code {} is too long to flatten, skipping", account.code),
        }
    }

    Ok(smallest_missing(&numbers)?.unwrap_or(1))
}
