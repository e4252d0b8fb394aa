//! SOAP response decoding.
//!
//! Every EWS response wraps one `*ResponseMessage` per requested target in
//! `m:ResponseMessages`. We only ever request one target, so the first
//! response message is the answer.

use chrono::{DateTime, Utc};
use tracing::warn;

use super::XmlNode;
use crate::error::{Error, Result};
use crate::types::{FlagStatus, Folder, FolderId, FolderKind, FolderPage, Item, ItemId, ItemPage, Page};

/// Decodes a `FindFolder` response into one page of folders.
///
/// # Errors
///
/// Returns an error on SOAP faults, EWS errors or malformed responses.
pub fn find_folder(xml: &str) -> Result<FolderPage> {
    let root = XmlNode::parse(xml)?;
    let message = response_message(&root)?;
    let paged = message
        .child("RootFolder")
        .ok_or_else(|| Error::Protocol("FindFolder response without RootFolder".to_string()))?;

    let folders = paged
        .child("Folders")
        .map(|f| f.children.iter().filter_map(parse_folder).collect())
        .unwrap_or_default();

    Ok(paging(paged, folders))
}

/// Decodes a `GetFolder` response for a single folder.
///
/// # Errors
///
/// Returns an error on SOAP faults, EWS errors or when no folder is returned.
pub fn get_folder(xml: &str) -> Result<Folder> {
    let root = XmlNode::parse(xml)?;
    let message = response_message(&root)?;
    message
        .child("Folders")
        .and_then(|f| f.children.iter().find_map(parse_folder))
        .ok_or_else(|| Error::Protocol("GetFolder response without a folder".to_string()))
}

/// Decodes a `FindItem` response into one page of items.
///
/// # Errors
///
/// Returns an error on SOAP faults, EWS errors or malformed responses.
pub fn find_item(xml: &str) -> Result<ItemPage> {
    let root = XmlNode::parse(xml)?;
    let message = response_message(&root)?;
    let paged = message
        .child("RootFolder")
        .ok_or_else(|| Error::Protocol("FindItem response without RootFolder".to_string()))?;

    let items = match paged.child("Items") {
        Some(items) => items
            .children
            .iter()
            .map(parse_item)
            .collect::<Result<Vec<_>>>()?,
        None => Vec::new(),
    };

    Ok(paging(paged, items))
}

/// Locates the single response message, turning faults and errors into `Err`.
fn response_message(root: &XmlNode) -> Result<&XmlNode> {
    let body = root
        .child("Body")
        .ok_or_else(|| Error::Protocol("SOAP envelope without Body".to_string()))?;

    if let Some(fault) = body.child("Fault") {
        let text = fault
            .child_text("faultstring")
            .or_else(|| fault.find("Text").map(|t| t.text.as_str()))
            .unwrap_or("unknown fault");
        return Err(Error::SoapFault(text.to_string()));
    }

    let message = body
        .find("ResponseMessages")
        .and_then(|m| m.children.first())
        .ok_or_else(|| Error::Protocol("response without ResponseMessages".to_string()))?;

    match message.attr("ResponseClass") {
        Some("Success") => Ok(message),
        Some("Warning") => {
            warn!(
                code = message.child_value("ResponseCode").unwrap_or_default(),
                text = message.child_text("MessageText").unwrap_or_default(),
                "EWS returned a warning"
            );
            Ok(message)
        }
        _ => Err(Error::response(
            message.child_value("ResponseCode").unwrap_or("Unknown"),
            message.child_text("MessageText").unwrap_or_default(),
        )),
    }
}

/// Reads the indexed paging attributes of a `RootFolder` element.
///
/// `IncludesLastItemInRange="false"` means more entries are available,
/// starting at `IndexedPagingOffset`.
fn paging<T>(paged: &XmlNode, entries: Vec<T>) -> Page<T> {
    let more_available = paged
        .attr("IncludesLastItemInRange")
        .is_some_and(|v| v.eq_ignore_ascii_case("false"));
    let next_offset = if more_available {
        paged
            .attr("IndexedPagingOffset")
            .and_then(|v| v.parse().ok())
    } else {
        None
    };
    Page {
        entries,
        more_available,
        next_offset,
        total: paged.attr("TotalItemsInView").and_then(|v| v.parse().ok()),
    }
}

fn parse_folder(node: &XmlNode) -> Option<Folder> {
    let kind = FolderKind::from_element(&node.name)?;
    let id = node.child("FolderId")?.attr("Id")?;
    Some(Folder {
        id: FolderId::new(id),
        display_name: node.child_text("DisplayName").unwrap_or_default().to_string(),
        kind,
    })
}

fn parse_item(node: &XmlNode) -> Result<Item> {
    let id = node
        .child("ItemId")
        .and_then(|i| i.attr("Id"))
        .ok_or_else(|| Error::Protocol(format!("{} without ItemId", node.name)))?;

    let received = node
        .child_value("DateTimeReceived")
        .map(parse_timestamp)
        .transpose()?;

    Ok(Item {
        id: ItemId::new(id),
        received,
        subject: node.child_text("Subject").map(str::to_string),
        is_read: node
            .child_value("IsRead")
            .is_some_and(|v| v.eq_ignore_ascii_case("true")),
        flag: node
            .path(&["Flag", "FlagStatus"])
            .map_or(FlagStatus::NotFlagged, |f| FlagStatus::parse(&f.text)),
        item_class: node.child_value("ItemClass").map(str::to_string),
    })
}

fn parse_timestamp(text: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| Error::Protocol(format!("bad timestamp {text:?}: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn envelope(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="utf-8"?>
<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/">
  <s:Header><h:ServerVersionInfo MajorVersion="15" xmlns:h="t"/></s:Header>
  <s:Body xmlns:m="m" xmlns:t="t">{body}</s:Body>
</s:Envelope>"#
        )
    }

    #[test]
    fn test_find_item_page() {
        let xml = envelope(
            r#"<m:FindItemResponse><m:ResponseMessages>
              <m:FindItemResponseMessage ResponseClass="Success">
                <m:ResponseCode>NoError</m:ResponseCode>
                <m:RootFolder IndexedPagingOffset="2" TotalItemsInView="3" IncludesLastItemInRange="false">
                  <t:Items>
                    <t:Message>
                      <t:ItemId Id="AAA=" ChangeKey="x"/>
                      <t:Subject>Quarterly &amp; stuff</t:Subject>
                      <t:DateTimeReceived>2024-03-01T10:15:30Z</t:DateTimeReceived>
                      <t:ItemClass>IPM.Note</t:ItemClass>
                      <t:IsRead>false</t:IsRead>
                      <t:Flag><t:FlagStatus>Complete</t:FlagStatus></t:Flag>
                    </t:Message>
                    <t:Message>
                      <t:ItemId Id="BBB=" ChangeKey="y"/>
                      <t:IsRead>true</t:IsRead>
                    </t:Message>
                  </t:Items>
                </m:RootFolder>
              </m:FindItemResponseMessage>
            </m:ResponseMessages></m:FindItemResponse>"#,
        );

        let page = find_item(&xml).unwrap();
        assert!(page.more_available);
        assert_eq!(page.next_offset, Some(2));
        assert_eq!(page.total, Some(3));
        assert_eq!(page.entries.len(), 2);

        let first = &page.entries[0];
        assert_eq!(first.id.as_str(), "AAA=");
        assert_eq!(first.subject.as_deref(), Some("Quarterly & stuff"));
        assert_eq!(
            first.received,
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 10, 15, 30).unwrap())
        );
        assert!(!first.is_read);
        assert_eq!(first.flag, FlagStatus::Complete);

        let second = &page.entries[1];
        assert!(second.is_read);
        assert_eq!(second.flag, FlagStatus::NotFlagged);
        assert!(second.subject.is_none());
    }

    #[test]
    fn test_subject_whitespace_is_preserved() {
        let xml = envelope(
            r#"<m:FindItemResponse><m:ResponseMessages>
              <m:FindItemResponseMessage ResponseClass="Success">
                <m:ResponseCode>NoError</m:ResponseCode>
                <m:RootFolder IndexedPagingOffset="2" TotalItemsInView="2" IncludesLastItemInRange="true">
                  <t:Items>
                    <t:Message>
                      <t:ItemId Id="S1="/>
                      <t:Subject>  [ext]  Budget  </t:Subject>
                      <t:IsRead> false </t:IsRead>
                    </t:Message>
                    <t:Message>
                      <t:ItemId Id="S2="/>
                      <t:Subject> </t:Subject>
                    </t:Message>
                  </t:Items>
                </m:RootFolder>
              </m:FindItemResponseMessage>
            </m:ResponseMessages></m:FindItemResponse>"#,
        );
        let page = find_item(&xml).unwrap();
        assert_eq!(page.entries[0].subject.as_deref(), Some("  [ext]  Budget  "));
        assert!(!page.entries[0].is_read);
        assert_eq!(page.entries[1].subject.as_deref(), Some(" "));
    }

    #[test]
    fn test_last_page_has_no_offset() {
        let xml = envelope(
            r#"<m:FindItemResponse><m:ResponseMessages>
              <m:FindItemResponseMessage ResponseClass="Success">
                <m:ResponseCode>NoError</m:ResponseCode>
                <m:RootFolder IndexedPagingOffset="0" TotalItemsInView="0" IncludesLastItemInRange="true">
                  <t:Items/>
                </m:RootFolder>
              </m:FindItemResponseMessage>
            </m:ResponseMessages></m:FindItemResponse>"#,
        );
        let page = find_item(&xml).unwrap();
        assert!(!page.more_available);
        assert_eq!(page.next_offset, None);
        assert!(page.entries.is_empty());
    }

    #[test]
    fn test_find_folder_kinds() {
        let xml = envelope(
            r#"<m:FindFolderResponse><m:ResponseMessages>
              <m:FindFolderResponseMessage ResponseClass="Success">
                <m:ResponseCode>NoError</m:ResponseCode>
                <m:RootFolder TotalItemsInView="2" IncludesLastItemInRange="true">
                  <t:Folders>
                    <t:SearchFolder><t:FolderId Id="s1"/><t:DisplayName>AllItems</t:DisplayName></t:SearchFolder>
                    <t:Folder><t:FolderId Id="f1"/><t:DisplayName>Receipts</t:DisplayName></t:Folder>
                  </t:Folders>
                </m:RootFolder>
              </m:FindFolderResponseMessage>
            </m:ResponseMessages></m:FindFolderResponse>"#,
        );
        let page = find_folder(&xml).unwrap();
        assert!(!page.more_available);
        assert_eq!(page.entries.len(), 2);
        assert_eq!(page.entries[0].kind, FolderKind::Search);
        assert_eq!(page.entries[0].display_name, "AllItems");
        assert_eq!(page.entries[1].kind, FolderKind::Generic);
    }

    #[test]
    fn test_get_folder() {
        let xml = envelope(
            r#"<m:GetFolderResponse><m:ResponseMessages>
              <m:GetFolderResponseMessage ResponseClass="Success">
                <m:ResponseCode>NoError</m:ResponseCode>
                <m:Folders><t:Folder><t:FolderId Id="junk" ChangeKey="k"/><t:DisplayName>Junk Email</t:DisplayName></t:Folder></m:Folders>
              </m:GetFolderResponseMessage>
            </m:ResponseMessages></m:GetFolderResponse>"#,
        );
        let folder = get_folder(&xml).unwrap();
        assert_eq!(folder.id.as_str(), "junk");
        assert_eq!(folder.display_name, "Junk Email");
    }

    #[test]
    fn test_error_response_class() {
        let xml = envelope(
            r#"<m:GetFolderResponse><m:ResponseMessages>
              <m:GetFolderResponseMessage ResponseClass="Error">
                <m:MessageText>The specified folder could not be found in the store.</m:MessageText>
                <m:ResponseCode>ErrorFolderNotFound</m:ResponseCode>
              </m:GetFolderResponseMessage>
            </m:ResponseMessages></m:GetFolderResponse>"#,
        );
        match get_folder(&xml) {
            Err(Error::Response { code, message }) => {
                assert_eq!(code, "ErrorFolderNotFound");
                assert!(message.contains("could not be found"));
            }
            other => panic!("Expected response error, got {other:?}"),
        }
    }

    #[test]
    fn test_soap_fault() {
        let xml = envelope(
            r"<s:Fault><faultcode>a:ErrorSchemaValidation</faultcode><faultstring>The request failed schema validation.</faultstring></s:Fault>",
        );
        match find_item(&xml) {
            Err(Error::SoapFault(text)) => assert!(text.contains("schema validation")),
            other => panic!("Expected SOAP fault, got {other:?}"),
        }
    }

    #[test]
    fn test_item_without_id_is_protocol_error() {
        let xml = envelope(
            r#"<m:FindItemResponse><m:ResponseMessages>
              <m:FindItemResponseMessage ResponseClass="Success">
                <m:RootFolder IncludesLastItemInRange="true"><t:Items><t:Message><t:Subject>x</t:Subject></t:Message></t:Items></m:RootFolder>
              </m:FindItemResponseMessage>
            </m:ResponseMessages></m:FindItemResponse>"#,
        );
        assert!(matches!(find_item(&xml), Err(Error::Protocol(_))));
    }
}
