//! Entity wrappers: elements the host owns and the engine only moves around.
//!
//! An entity is recognised by the `_Entity` class on its wrapper. Its type,
//! id and readonly flag ride along as `_EType_<type>`, `_EId_<id>` and
//! `_EReadonly_1` classes.

use smol_str::SmolStr;
use weaver_content_dom::{Dom, NodeId};

use crate::model::EntityFormat;

pub const ENTITY_CLASS: &str = "_Entity";
const TYPE_PREFIX: &str = "_EType_";
const ID_PREFIX: &str = "_EId_";
const READONLY_CLASS: &str = "_EReadonly_1";

pub fn is_entity_element(dom: &Dom, element: NodeId) -> bool {
    dom.has_class(element, ENTITY_CLASS)
}

pub fn parse_entity_format(dom: &Dom, element: NodeId) -> EntityFormat {
    let mut format = EntityFormat::default();
    for class in dom.classes(element) {
        if let Some(entity_type) = class.strip_prefix(TYPE_PREFIX) {
            format.entity_type = Some(SmolStr::new(entity_type));
        } else if let Some(id) = class.strip_prefix(ID_PREFIX) {
            format.id = Some(SmolStr::new(id));
        } else if class == READONLY_CLASS {
            format.is_readonly = true;
        }
    }
    format
}

/// Stamp the entity classes (and `contenteditable` for readonly entities)
/// on a wrapper. Classes the wrapper already carries are kept.
pub fn apply_entity_format(dom: &mut Dom, wrapper: NodeId, format: &EntityFormat) {
    if format.is_fake_entity {
        return;
    }
    dom.add_class(wrapper, ENTITY_CLASS);
    if let Some(entity_type) = &format.entity_type {
        dom.add_class(wrapper, &format!("{TYPE_PREFIX}{entity_type}"));
    }
    if let Some(id) = &format.id {
        dom.add_class(wrapper, &format!("{ID_PREFIX}{id}"));
    }
    if format.is_readonly {
        dom.add_class(wrapper, READONLY_CLASS);
        dom.set_attribute(wrapper, "contenteditable", "false");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_classes_round_trip() {
        let mut dom = Dom::new();
        let wrapper = dom.create_element("span");
        let format = EntityFormat {
            id: Some("mention1".into()),
            entity_type: Some("mention".into()),
            is_readonly: true,
            is_fake_entity: false,
        };
        apply_entity_format(&mut dom, wrapper, &format);

        assert!(is_entity_element(&dom, wrapper));
        assert_eq!(parse_entity_format(&dom, wrapper), format);
        assert_eq!(dom.attribute(wrapper, "contenteditable"), Some("false"));
    }

    #[test]
    fn test_fake_entities_are_not_stamped() {
        let mut dom = Dom::new();
        let table = dom.create_element("table");
        let format = EntityFormat {
            is_readonly: true,
            is_fake_entity: true,
            ..Default::default()
        };
        apply_entity_format(&mut dom, table, &format);
        assert!(!is_entity_element(&dom, table));
        assert_eq!(dom.attribute(table, "class"), None);
    }
}
