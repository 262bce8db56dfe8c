//! Item Assembler
//!
//! Merges parsed attribute fragments into one ordered list of item
//! records. Total and deterministic: every distinct index yields exactly
//! one record, missing attributes default to empty strings, and the
//! output is ascending by index regardless of arrival order.

use std::collections::BTreeMap;

use tradein_core::ItemRecord;

use crate::fields::AttrBag;

/// `desired_offer` is the older form revision's name for the asking price.
const PRICE_ATTRIBUTES: &[&str] = &["desired_price", "desired_offer"];

/// Produce one `ItemRecord` per distinct index, sorted ascending.
pub fn assemble_items(item_attrs: BTreeMap<u32, AttrBag>) -> Vec<ItemRecord> {
    item_attrs
        .into_iter()
        .map(|(index, mut bag)| {
            let desired_price = PRICE_ATTRIBUTES
                .iter()
                .find_map(|name| bag.remove(*name))
                .unwrap_or_default();
            ItemRecord {
                index,
                brand_model: bag.remove("brand_model").unwrap_or_default(),
                size: bag.remove("size").unwrap_or_default(),
                condition: bag.remove("condition").unwrap_or_default(),
                desired_price,
                has_box: bag.remove("has_box").unwrap_or_default(),
                notes: bag.remove("notes").unwrap_or_default(),
                photos: Vec::new(),
            }
        })
        .collect()
}
