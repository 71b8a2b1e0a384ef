//! Converter and editor options.
//!
//! Everything here is plain data with `Default` and serde support so a host
//! can keep it in a JSON config. Processor and handler overrides are not
//! options: they are passed to the converters as trait objects.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::error::Result;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DomToModelOption {
    /// Remember source elements on paragraphs, dividers and tables so the
    /// next output pass can reuse them.
    pub allow_cache_element: bool,
    /// Only model the subtree around the selection. Everything else
    /// collapses to empty placeholder paragraphs.
    pub reduced_model: bool,
    /// Turn tables without editing metadata into readonly entities unless
    /// the selection reaches into them.
    pub freeze_foreign_tables: bool,
}

impl Default for DomToModelOption {
    fn default() -> Self {
        Self {
            allow_cache_element: true,
            reduced_model: false,
            freeze_foreign_tables: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModelToDomOption {
    /// Reuse cached elements for unchanged paragraphs, dividers and tables.
    pub allow_cache_element: bool,
}

impl Default for ModelToDomOption {
    fn default() -> Self {
        Self {
            allow_cache_element: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorOptions {
    pub dom_to_model: DomToModelOption,
    pub model_to_dom: ModelToDomOption,
    /// Namespace of the editor's paragraph markers. Peers editing the same
    /// document must use different namespaces.
    pub paragraph_marker_namespace: SmolStr,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            dom_to_model: DomToModelOption::default(),
            model_to_dom: ModelToDomOption::default(),
            paragraph_marker_namespace: SmolStr::new_static("local"),
        }
    }
}

impl EditorOptions {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let options = EditorOptions::from_json(
            r#"{"domToModel": {"reducedModel": true}, "paragraphMarkerNamespace": "peer1"}"#,
        )
        .unwrap();
        assert!(options.dom_to_model.reduced_model);
        assert!(options.dom_to_model.allow_cache_element);
        assert!(options.dom_to_model.freeze_foreign_tables);
        assert!(options.model_to_dom.allow_cache_element);
        assert_eq!(options.paragraph_marker_namespace, "peer1");
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(EditorOptions::from_json("{not json").is_err());
    }
}
