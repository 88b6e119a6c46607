//! Alternative whole-list ordering through an external suggester.
//!
//! This path may fail outright. When it does, or when the suggestion is not
//! a reordering of the input, the input order is returned unchanged so the
//! caller can still open the map with it.

use crate::traits::{OrderSuggester, Stop};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestionOutcome {
    Applied,
    /// Input order kept; the reason is meant for the user.
    Fallback(String),
}

/// Reorders `stops` by the suggester's address order, or keeps them as given.
pub fn reorder_or_original<T, O>(stops: Vec<T>, suggester: &O) -> (Vec<T>, SuggestionOutcome)
where
    T: Stop,
    O: OrderSuggester + ?Sized,
{
    let addresses: Vec<String> = stops
        .iter()
        .map(|stop| stop.address().unwrap_or_default().trim().to_string())
        .collect();

    let suggested = match suggester.suggest_order(&addresses) {
        Ok(suggested) => suggested,
        Err(err) => {
            tracing::warn!(error = %err, "order suggestion failed, keeping input order");
            return (stops, SuggestionOutcome::Fallback(err.to_string()));
        }
    };

    let Some(order) = match_addresses(&addresses, &suggested) else {
        tracing::warn!(
            expected = addresses.len(),
            got = suggested.len(),
            "suggested order is not a permutation of the input, keeping input order"
        );
        return (
            stops,
            SuggestionOutcome::Fallback("suggestion did not match the selected addresses".to_string()),
        );
    };

    let mut slots: Vec<Option<T>> = stops.into_iter().map(Some).collect();
    let reordered = order.into_iter().filter_map(|index| slots[index].take()).collect();
    (reordered, SuggestionOutcome::Applied)
}

/// Maps each suggested address to the first unused input position holding it.
fn match_addresses(addresses: &[String], suggested: &[String]) -> Option<Vec<usize>> {
    if addresses.len() != suggested.len() {
        return None;
    }

    let mut used = vec![false; addresses.len()];
    suggested
        .iter()
        .map(|address| {
            let address = address.trim();
            let index = addresses
                .iter()
                .enumerate()
                .position(|(i, candidate)| !used[i] && candidate == address)?;
            used[index] = true;
            Some(index)
        })
        .collect()
}
