//! Typed editing metadata stored as JSON in `data-editing-info`.
//!
//! A blob is only trusted after it parses and validates against its
//! [`Definition`]. Anything else reads as "no metadata".

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::definition::{Definition, validate};
use crate::error::Result;
use crate::format::Dataset;

/// Dataset key (camelCase) holding the JSON metadata blob.
pub const EDITING_INFO: &str = "editingInfo";

const TARGET: &str = "weaver::content_model::metadata";

/// Read and validate the metadata blob of a node.
pub fn get_metadata<T: DeserializeOwned>(dataset: &Dataset, definition: &Definition) -> Option<T> {
    let raw = dataset.get(EDITING_INFO)?;
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(error) => {
            tracing::warn!(target: TARGET, %error, "dropping unparseable metadata");
            return None;
        }
    };
    if !validate(Some(&value), definition) {
        tracing::trace!(target: TARGET, "metadata failed validation");
        return None;
    }
    match serde_json::from_value(value) {
        Ok(metadata) => Some(metadata),
        Err(error) => {
            tracing::warn!(target: TARGET, %error, "metadata validated but did not deserialize");
            None
        }
    }
}

/// Read the metadata blob, let `callback` edit it, and write the result back.
///
/// Returning `None` from the callback removes the blob. A result that does
/// not validate is returned but not written.
pub fn update_metadata<T, F>(
    dataset: &mut Dataset,
    definition: &Definition,
    callback: F,
) -> Result<Option<T>>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce(Option<T>) -> Option<T>,
{
    let current = get_metadata(dataset, definition);
    let updated = callback(current);

    match &updated {
        None => {
            dataset.remove(EDITING_INFO);
        }
        Some(metadata) => {
            let value = serde_json::to_value(metadata)?;
            if validate(Some(&value), definition) {
                dataset.insert(EDITING_INFO.into(), serde_json::to_string(&value)?);
            } else {
                tracing::warn!(target: TARGET, "refusing to write metadata that fails validation");
            }
        }
    }
    Ok(updated)
}

/// Whether a node carries a metadata blob, valid or not.
pub fn has_metadata(dataset: &Dataset) -> bool {
    dataset.contains_key(EDITING_INFO)
}

/// List style choice stored on a list level.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMetadataFormat {
    /// A [`NumberingListType`](crate::list::NumberingListType) value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordered_style_type: Option<u8>,
    /// A [`BulletListType`](crate::list::BulletListType) value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unordered_style_type: Option<u8>,
    /// Pick the style from the nesting depth instead of the stored values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apply_list_style_from_level: Option<bool>,
}

pub fn list_metadata_definition() -> Definition {
    Definition::object([
        (
            "orderedStyleType",
            Definition::number_range(Some(1.0), Some(20.0)).optional(),
        ),
        (
            "unorderedStyleType",
            Definition::number_range(Some(1.0), Some(9.0)).optional(),
        ),
        ("applyListStyleFromLevel", Definition::boolean().optional()),
    ])
}

/// Table-wide styling choices.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableMetadataFormat {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_border_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom_border_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertical_border_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_header_row: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_row_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_first_column: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_banded_rows: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_banded_columns: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_color_even: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_color_odd: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertical_align: Option<String>,
}

pub fn table_metadata_definition() -> Definition {
    let color = || Definition::string().optional().nullable();
    let flag = || Definition::boolean().optional();
    Definition::object([
        ("topBorderColor", color()),
        ("bottomBorderColor", color()),
        ("verticalBorderColor", color()),
        ("hasHeaderRow", flag()),
        ("headerRowColor", color()),
        ("hasFirstColumn", flag()),
        ("hasBandedRows", flag()),
        ("hasBandedColumns", flag()),
        ("bgColorEven", color()),
        ("bgColorOdd", color()),
        ("verticalAlign", Definition::string().optional().nullable()),
    ])
}

/// Per-cell flags that protect manual edits from table-wide restyling.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCellMetadataFormat {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_color_override: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v_align_override: Option<bool>,
}

pub fn table_cell_metadata_definition() -> Definition {
    Definition::object([
        ("bgColorOverride", Definition::boolean().optional()),
        ("vAlignOverride", Definition::boolean().optional()),
    ])
}

/// Crop, resize and rotate state of an edited image.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageMetadataFormat {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width_px: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_px: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub natural_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub natural_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle_rad: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
}

pub fn image_metadata_definition() -> Definition {
    let size = || Definition::number_range(Some(0.0), None).optional();
    let percent = || Definition::number().optional();
    Definition::object([
        ("widthPx", size()),
        ("heightPx", size()),
        ("naturalWidth", size()),
        ("naturalHeight", size()),
        ("leftPercent", percent()),
        ("rightPercent", percent()),
        ("topPercent", percent()),
        ("bottomPercent", percent()),
        ("angleRad", Definition::number().optional()),
        ("src", Definition::string().optional()),
    ])
}
