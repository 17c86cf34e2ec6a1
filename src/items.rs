//! Parser for the free-text items mini-language.
//!
//! An items field holds one or more comma-separated segments such as
//! `Large Latte - Vanilla - 3.5` or `Regular Coffee - 2.5`. The grammar is
//! ambiguous: the with-variant shape is a superset of the without-variant
//! shape, so the more specific pattern must be tried first or a variant
//! would be absorbed into the item name. Pattern order is load-bearing for
//! output stability.

use regex::Regex;
use tracing::warn;

use crate::error::{EtlError, Result};
use crate::metrics::EtlMetrics;
use crate::models::ParsedItem;

/// Parser for the items field, with both segment patterns compiled once.
pub struct ItemParser {
    with_variant: Regex,
    without_variant: Regex,
    metrics: EtlMetrics,
}

impl ItemParser {
    /// Create a new item parser.
    pub fn new() -> Result<Self> {
        let with_variant = Regex::new(
            r"^(?P<size>\w+)\s+(?P<item_name>[a-zA-Z\s]+)\s+-\s+(?P<variant>[a-zA-Z\s]+)\s+-\s+(?P<price>[0-9.]+)$",
        )
        .map_err(|e| EtlError::Other(format!("Failed to compile with-variant regex: {e}")))?;
        let without_variant = Regex::new(
            r"^(?P<size>\w+)\s+(?P<item_name>[a-zA-Z\s]+)\s+-\s+(?P<price>[0-9.]+)$",
        )
        .map_err(|e| EtlError::Other(format!("Failed to compile without-variant regex: {e}")))?;

        Ok(Self {
            with_variant,
            without_variant,
            metrics: EtlMetrics::default(),
        })
    }

    /// Parse an items field into structured line items.
    ///
    /// Segments that match neither pattern are dropped with a diagnostic;
    /// a single bad segment never fails the whole field. Callers that need
    /// strict validation can compare the returned count against the number
    /// of segments they expect.
    #[must_use]
    pub fn parse_items(&self, items_column: &str) -> Vec<ParsedItem> {
        let mut parsed_items = Vec::new();

        for segment in items_column.split(',') {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }

            // More specific pattern first; see module docs.
            let matched = self
                .match_segment(segment, true)
                .or_else(|| self.match_segment(segment, false));
            match matched {
                Some(SegmentMatch::Item(item)) => parsed_items.push(item),
                Some(SegmentMatch::BadPrice(price)) => {
                    warn!(segment, price = %price, "item price not numeric, segment dropped");
                    self.metrics.record_item_skipped();
                },
                None => {
                    warn!(segment, "item format not matched, segment dropped");
                    self.metrics.record_item_skipped();
                },
            }
        }

        self.metrics.record_items_parsed(parsed_items.len());
        parsed_items
    }

    fn match_segment(&self, segment: &str, with_variant: bool) -> Option<SegmentMatch> {
        let regex = if with_variant {
            &self.with_variant
        } else {
            &self.without_variant
        };
        let captures = regex.captures(segment)?;

        // `[0-9.]+` admits shapes like `3.5.5`; the structural match stands
        // but the segment is reported as a price failure, exactly once.
        let price_text = captures["price"].trim().to_string();
        let Ok(price) = price_text.parse::<f64>() else {
            return Some(SegmentMatch::BadPrice(price_text));
        };

        Some(SegmentMatch::Item(ParsedItem {
            item_name: captures["item_name"].trim().to_string(),
            variant: if with_variant {
                Some(captures["variant"].trim().to_string())
            } else {
                None
            },
            size: captures["size"].trim().to_string(),
            price,
        }))
    }
}

/// Outcome of matching one segment against one pattern.
enum SegmentMatch {
    /// The segment parsed cleanly
    Item(ParsedItem),
    /// The pattern matched but the price text is not a number
    BadPrice(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> ItemParser {
        ItemParser::new().expect("Failed to create item parser")
    }

    #[test]
    fn test_with_variant_segment() {
        let items = parser().parse_items("Regular Latte - Vanilla - 3.5");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].size, "Regular");
        assert_eq!(items[0].item_name, "Latte");
        assert_eq!(items[0].variant.as_deref(), Some("Vanilla"));
        assert_eq!(items[0].price, 3.5);
    }

    #[test]
    fn test_without_variant_segment() {
        let items = parser().parse_items("Regular Latte - 3.5");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].size, "Regular");
        assert_eq!(items[0].item_name, "Latte");
        assert_eq!(items[0].variant, None);
        assert_eq!(items[0].price, 3.5);
    }

    #[test]
    fn test_multi_word_item_name() {
        let items = parser().parse_items("Large Flat White - 3.0");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].item_name, "Flat White");
        assert_eq!(items[0].variant, None);
    }

    #[test]
    fn test_multiple_segments() {
        let items = parser().parse_items("Large Latte - Vanilla - 3.5, Regular Coffee - 2.5");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].item_name, "Latte");
        assert_eq!(items[0].variant.as_deref(), Some("Vanilla"));
        assert_eq!(items[1].item_name, "Coffee");
        assert_eq!(items[1].variant, None);
        assert_eq!(items[1].price, 2.5);
    }

    #[test]
    fn test_unmatched_segment_dropped_silently() {
        let items = parser().parse_items("not a valid item format");
        assert!(items.is_empty());
    }

    #[test]
    fn test_bad_segment_does_not_poison_good_ones() {
        let items = parser().parse_items("garbage!!!, Regular Coffee - 2.5");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].item_name, "Coffee");
    }

    #[test]
    fn test_malformed_price_drops_segment_only() {
        let items = parser().parse_items("Regular Coffee - 2.5.5, Regular Tea - 1.5");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].item_name, "Tea");
    }

    #[test]
    fn test_malformed_price_with_variant_shape_dropped_once() {
        // The structural match wins even when the price is garbage; the
        // fallback pattern must not get a second try at the segment.
        let items = parser().parse_items("Large Latte - Vanilla - 3.5.5, Regular Tea - 1.5");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].item_name, "Tea");
        assert_eq!(items[0].variant, None);
    }

    #[test]
    fn test_empty_field_and_blank_segments() {
        assert!(parser().parse_items("").is_empty());
        let items = parser().parse_items("Regular Coffee - 2.5, , ");
        assert_eq!(items.len(), 1);
    }
}
