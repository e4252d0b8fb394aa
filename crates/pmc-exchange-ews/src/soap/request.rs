//! SOAP request encoding.
//!
//! Each function produces a complete `soap:Envelope` for one EWS operation.

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesText, Event};

use crate::error::{Error, Result};
use crate::types::{FolderRef, PageView, PropertyPath, Restriction, Traversal};

const SOAP_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
const TYPES_NS: &str = "http://schemas.microsoft.com/exchange/services/2006/types";
const MESSAGES_NS: &str = "http://schemas.microsoft.com/exchange/services/2006/messages";

/// Schema version announced in `t:RequestServerVersion`.
pub const SERVER_VERSION: &str = "Exchange2016";

/// Properties requested for every item: enough to build an output record.
pub const ITEM_PROPERTIES: &[&str] = &[
    "item:DateTimeReceived",
    "item:Subject",
    "item:Flag",
    "item:ItemClass",
    "message:IsRead",
];

/// Properties requested for every folder.
pub const FOLDER_PROPERTIES: &[&str] = &["folder:DisplayName"];

type XmlWriter = Writer<Vec<u8>>;

/// Encodes a `FindFolder` request.
///
/// # Errors
///
/// Returns an error if XML serialization fails.
pub fn find_folder(
    parent: &FolderRef,
    traversal: Traversal,
    view: PageView,
    restriction: Option<&Restriction>,
) -> Result<String> {
    envelope(|w| {
        w.create_element("m:FindFolder")
            .with_attribute(("Traversal", traversal.as_str()))
            .write_inner_content(|w| {
                shape(w, "m:FolderShape", FOLDER_PROPERTIES)?;
                page_view(w, "m:IndexedPageFolderView", view)?;
                if let Some(restriction) = restriction {
                    w.create_element("m:Restriction")
                        .write_inner_content(|w| write_restriction(w, restriction))?;
                }
                w.create_element("m:ParentFolderIds")
                    .write_inner_content(|w| folder_ref(w, parent))?;
                Ok::<(), quick_xml::Error>(())
            })?;
        Ok(())
    })
}

/// Encodes a `GetFolder` request for a single folder.
///
/// # Errors
///
/// Returns an error if XML serialization fails.
pub fn get_folder(target: &FolderRef) -> Result<String> {
    envelope(|w| {
        w.create_element("m:GetFolder").write_inner_content(|w| {
            shape(w, "m:FolderShape", FOLDER_PROPERTIES)?;
            w.create_element("m:FolderIds")
                .write_inner_content(|w| folder_ref(w, target))?;
            Ok::<(), quick_xml::Error>(())
        })?;
        Ok(())
    })
}

/// Encodes a shallow `FindItem` request over one folder.
///
/// # Errors
///
/// Returns an error if XML serialization fails.
pub fn find_item(parent: &FolderRef, view: PageView, restriction: &Restriction) -> Result<String> {
    envelope(|w| {
        w.create_element("m:FindItem")
            .with_attribute(("Traversal", Traversal::Shallow.as_str()))
            .write_inner_content(|w| {
                shape(w, "m:ItemShape", ITEM_PROPERTIES)?;
                page_view(w, "m:IndexedPageItemView", view)?;
                w.create_element("m:Restriction")
                    .write_inner_content(|w| write_restriction(w, restriction))?;
                w.create_element("m:ParentFolderIds")
                    .write_inner_content(|w| folder_ref(w, parent))?;
                Ok::<(), quick_xml::Error>(())
            })?;
        Ok(())
    })
}

fn envelope<F>(body: F) -> Result<String>
where
    F: FnOnce(&mut XmlWriter) -> quick_xml::Result<()>,
{
    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    writer
        .create_element("soap:Envelope")
        .with_attribute(("xmlns:soap", SOAP_NS))
        .with_attribute(("xmlns:t", TYPES_NS))
        .with_attribute(("xmlns:m", MESSAGES_NS))
        .write_inner_content(|w| {
            w.create_element("soap:Header").write_inner_content(|w| {
                w.create_element("t:RequestServerVersion")
                    .with_attribute(("Version", SERVER_VERSION))
                    .write_empty()?;
                Ok::<(), quick_xml::Error>(())
            })?;
            w.create_element("soap:Body").write_inner_content(body)?;
            Ok::<(), quick_xml::Error>(())
        })?;

    String::from_utf8(writer.into_inner())
        .map_err(|e| Error::Protocol(format!("request is not UTF-8: {e}")))
}

fn shape(w: &mut XmlWriter, element: &str, properties: &[&str]) -> quick_xml::Result<()> {
    w.create_element(element).write_inner_content(|w| {
        w.create_element("t:BaseShape")
            .write_text_content(BytesText::new("IdOnly"))?;
        w.create_element("t:AdditionalProperties")
            .write_inner_content(|w| {
                for property in properties {
                    w.create_element("t:FieldURI")
                        .with_attribute(("FieldURI", *property))
                        .write_empty()?;
                }
                Ok::<(), quick_xml::Error>(())
            })?;
        Ok::<(), quick_xml::Error>(())
    })?;
    Ok(())
}

fn page_view(w: &mut XmlWriter, element: &str, view: PageView) -> quick_xml::Result<()> {
    let max = view.page_size.to_string();
    let offset = view.offset.to_string();
    w.create_element(element)
        .with_attribute(("MaxEntriesReturned", max.as_str()))
        .with_attribute(("Offset", offset.as_str()))
        .with_attribute(("BasePoint", "Beginning"))
        .write_empty()?;
    Ok(())
}

fn folder_ref(w: &mut XmlWriter, target: &FolderRef) -> quick_xml::Result<()> {
    match target {
        FolderRef::WellKnown(folder) => {
            w.create_element("t:DistinguishedFolderId")
                .with_attribute(("Id", folder.as_str()))
                .write_empty()?;
        }
        FolderRef::Id(id) => {
            w.create_element("t:FolderId")
                .with_attribute(("Id", id.as_str()))
                .write_empty()?;
        }
    }
    Ok(())
}

fn write_restriction(w: &mut XmlWriter, restriction: &Restriction) -> quick_xml::Result<()> {
    match restriction {
        Restriction::And(parts) => {
            w.create_element("t:And").write_inner_content(|w| {
                for part in parts {
                    write_restriction(w, part)?;
                }
                Ok::<(), quick_xml::Error>(())
            })?;
        }
        Restriction::IsEqualTo(path, value) => comparison(w, "t:IsEqualTo", path, value)?,
        Restriction::IsNotEqualTo(path, value) => comparison(w, "t:IsNotEqualTo", path, value)?,
        Restriction::Exists(path) => {
            w.create_element("t:Exists")
                .write_inner_content(|w| property_path(w, path))?;
        }
    }
    Ok(())
}

fn comparison(
    w: &mut XmlWriter,
    element: &str,
    path: &PropertyPath,
    value: &str,
) -> quick_xml::Result<()> {
    w.create_element(element).write_inner_content(|w| {
        property_path(w, path)?;
        w.create_element("t:FieldURIOrConstant")
            .write_inner_content(|w| {
                w.create_element("t:Constant")
                    .with_attribute(("Value", value))
                    .write_empty()?;
                Ok::<(), quick_xml::Error>(())
            })?;
        Ok::<(), quick_xml::Error>(())
    })?;
    Ok(())
}

fn property_path(w: &mut XmlWriter, path: &PropertyPath) -> quick_xml::Result<()> {
    match path {
        PropertyPath::Field(uri) => {
            w.create_element("t:FieldURI")
                .with_attribute(("FieldURI", *uri))
                .write_empty()?;
        }
        PropertyPath::Extended(property) => {
            let tag = property.tag_hex();
            w.create_element("t:ExtendedFieldURI")
                .with_attribute(("PropertyTag", tag.as_str()))
                .with_attribute(("PropertyType", property.kind.as_str()))
                .write_empty()?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::soap::XmlNode;
    use crate::types::{ExtendedProperty, FolderId, WellKnownFolder};

    #[test]
    fn test_find_item_envelope() {
        let restriction = Restriction::and([
            Restriction::Exists(PropertyPath::Extended(ExtendedProperty::FLAG_STATUS)),
            Restriction::is_equal_to(PropertyPath::ITEM_CLASS, "IPM.Note"),
            Restriction::is_not_equal_to(PropertyPath::PARENT_FOLDER_ID, "junk-id"),
        ]);
        let xml = find_item(
            &FolderRef::Id(FolderId::new("all-items")),
            PageView::new(1000).at(2000),
            &restriction,
        )
        .unwrap();

        let root = XmlNode::parse(&xml).unwrap();
        let find = root.path(&["Body", "FindItem"]).unwrap();
        assert_eq!(find.attr("Traversal"), Some("Shallow"));

        let view = find.child("IndexedPageItemView").unwrap();
        assert_eq!(view.attr("MaxEntriesReturned"), Some("1000"));
        assert_eq!(view.attr("Offset"), Some("2000"));

        let and = find.path(&["Restriction", "And"]).unwrap();
        assert_eq!(and.children.len(), 3);
        let ext = and.path(&["Exists", "ExtendedFieldURI"]).unwrap();
        assert_eq!(ext.attr("PropertyTag"), Some("0x1090"));
        assert_eq!(ext.attr("PropertyType"), Some("Integer"));

        let ne = and.child("IsNotEqualTo").unwrap();
        assert_eq!(
            ne.path(&["FieldURIOrConstant", "Constant"])
                .unwrap()
                .attr("Value"),
            Some("junk-id")
        );

        let parent = find.path(&["ParentFolderIds", "FolderId"]).unwrap();
        assert_eq!(parent.attr("Id"), Some("all-items"));
    }

    #[test]
    fn test_find_item_requests_projection_only() {
        let xml = find_item(
            &FolderRef::Id(FolderId::new("f")),
            PageView::new(1000),
            &Restriction::is_equal_to(PropertyPath::IS_READ, "false"),
        )
        .unwrap();
        let root = XmlNode::parse(&xml).unwrap();
        let shape = root.find("ItemShape").unwrap();
        assert_eq!(shape.child_text("BaseShape"), Some("IdOnly"));
        let fields: Vec<_> = shape
            .child("AdditionalProperties")
            .unwrap()
            .children
            .iter()
            .filter_map(|f| f.attr("FieldURI"))
            .collect();
        assert_eq!(fields, ITEM_PROPERTIES);
    }

    #[test]
    fn test_find_folder_without_restriction() {
        let xml = find_folder(
            &FolderRef::WellKnown(WellKnownFolder::Inbox),
            Traversal::Deep,
            PageView::new(10),
            None,
        )
        .unwrap();
        let root = XmlNode::parse(&xml).unwrap();
        let find = root.find("FindFolder").unwrap();
        assert_eq!(find.attr("Traversal"), Some("Deep"));
        assert!(find.child("Restriction").is_none());
        assert_eq!(
            find.path(&["ParentFolderIds", "DistinguishedFolderId"])
                .unwrap()
                .attr("Id"),
            Some("inbox")
        );
    }

    #[test]
    fn test_get_folder_escapes_and_versions() {
        let xml = get_folder(&FolderRef::WellKnown(WellKnownFolder::JunkEmail)).unwrap();
        assert!(xml.starts_with("<?xml"));
        let root = XmlNode::parse(&xml).unwrap();
        assert_eq!(
            root.path(&["Header", "RequestServerVersion"])
                .unwrap()
                .attr("Version"),
            Some(SERVER_VERSION)
        );
        assert!(root.find("GetFolder").is_some());
    }

    #[test]
    fn test_constant_values_are_escaped() {
        let xml = find_item(
            &FolderRef::Id(FolderId::new("f")),
            PageView::new(1),
            &Restriction::is_equal_to(PropertyPath::ITEM_CLASS, "a<b&\"c\""),
        )
        .unwrap();
        assert!(!xml.contains("a<b"));
        let root = XmlNode::parse(&xml).unwrap();
        assert_eq!(root.find("Constant").unwrap().attr("Value"), Some("a<b&\"c\""));
    }
}
