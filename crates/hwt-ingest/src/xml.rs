//! XML well-formedness check and generic element tree.
//!
//! Submissions arrive as raw XML text. Parsing stops at the first defect the
//! parser reports, preserving its message and byte position; structurally
//! valid input becomes an [`Element`] tree that the validator and transformer
//! walk without any schema knowledge.

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::error::IngestError;

/// One parsed XML element: tag name, accumulated text, child elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub text: Option<String>,
    pub children: Vec<Element>,
}

impl Element {
    fn new(name: String) -> Self {
        Self {
            name,
            text: None,
            children: Vec::new(),
        }
    }

    /// First child with the given tag name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All children with the given tag name.
    ///
    /// A single item and a list of items are the same shape to callers:
    /// both come back as a `Vec` with one entry per occurrence.
    pub fn children_named(&self, name: &str) -> Vec<&Element> {
        self.children.iter().filter(|c| c.name == name).collect()
    }

    /// Trimmed text content, `None` when absent or blank.
    pub fn text(&self) -> Option<&str> {
        self.text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// Trimmed text of the first child with the given tag name.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).and_then(Element::text)
    }

    /// Dotted path lookup, e.g. `path(&["Header", "InstitutionId"])`.
    pub fn path(&self, segments: &[&str]) -> Option<&Element> {
        let mut current = self;
        for segment in segments {
            current = current.child(segment)?;
        }
        Some(current)
    }
}

/// Parse a raw XML document into its root element.
///
/// Fails with the first parser-reported defect (message and byte position
/// preserved) for malformed input, and for documents without a single root
/// element.
pub fn parse_document(raw: &str) -> Result<Element, IngestError> {
    let mut reader = Reader::from_str(raw);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
                stack.push(Element::new(name));
            }
            Ok(Event::Empty(start)) => {
                let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
                let element = Element::new(name);
                attach(element, &mut stack, &mut root, &reader)?;
            }
            Ok(Event::Text(text)) => {
                let content = text.xml_content().map_err(|error| IngestError::Malformed {
                    position: reader.error_position(),
                    message: error.to_string(),
                })?;
                if let Some(current) = stack.last_mut() {
                    let slot = current.text.get_or_insert_with(String::new);
                    slot.push_str(&content);
                }
            }
            Ok(Event::End(_)) => {
                let element = stack.pop().ok_or_else(|| IngestError::Malformed {
                    position: reader.error_position(),
                    message: "unexpected closing tag".to_string(),
                })?;
                attach(element, &mut stack, &mut root, &reader)?;
            }
            Ok(Event::Eof) => break,
            // Declarations, comments, processing instructions and CDATA
            // carry no structure the pipeline cares about.
            Ok(Event::CData(data)) => {
                if let Some(current) = stack.last_mut() {
                    let slot = current.text.get_or_insert_with(String::new);
                    slot.push_str(&String::from_utf8_lossy(data.as_ref()));
                }
            }
            Ok(_) => {}
            Err(error) => {
                return Err(IngestError::Malformed {
                    position: reader.error_position(),
                    message: error.to_string(),
                });
            }
        }
    }

    if !stack.is_empty() {
        return Err(IngestError::Malformed {
            position: reader.error_position(),
            message: format!("unclosed element <{}>", stack[stack.len() - 1].name),
        });
    }

    root.ok_or_else(|| IngestError::Malformed {
        position: 0,
        message: "document has no root element".to_string(),
    })
}

fn attach(
    element: Element,
    stack: &mut Vec<Element>,
    root: &mut Option<Element>,
    reader: &Reader<&[u8]>,
) -> Result<(), IngestError> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(element);
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(element);
            Ok(())
        }
        None => Err(IngestError::Malformed {
            position: reader.error_position(),
            message: "multiple root elements".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_elements() {
        let root = parse_document(
            "<EmergencyReport>\
               <Header><InstitutionId>101</InstitutionId></Header>\
               <State>Aberta</State>\
             </EmergencyReport>",
        )
        .unwrap();
        assert_eq!(root.name, "EmergencyReport");
        assert_eq!(
            root.path(&["Header", "InstitutionId"]).and_then(Element::text),
            Some("101")
        );
        assert_eq!(root.child_text("State"), Some("Aberta"));
    }

    #[test]
    fn single_item_and_list_share_a_shape() {
        let single = parse_document("<L><Item>1</Item></L>").unwrap();
        let list = parse_document("<L><Item>1</Item><Item>2</Item></L>").unwrap();
        assert_eq!(single.children_named("Item").len(), 1);
        assert_eq!(list.children_named("Item").len(), 2);
    }

    #[test]
    fn malformed_input_reports_first_defect() {
        let error = parse_document("<A><B></A>").unwrap_err();
        match error {
            IngestError::Malformed { position, message } => {
                assert!(position > 0);
                assert!(!message.is_empty());
            }
            other => panic!("expected malformed, got {other:?}"),
        }
    }

    #[test]
    fn unclosed_element_is_malformed() {
        assert!(parse_document("<A><B>text</B>").is_err());
    }

    #[test]
    fn empty_elements_and_blank_text() {
        let root = parse_document("<A><B/><C>   </C></A>").unwrap();
        assert!(root.child("B").is_some());
        assert_eq!(root.child_text("C"), None);
    }

    #[test]
    fn parsing_is_deterministic() {
        let raw = "<A><B>x</B></A>";
        assert_eq!(parse_document(raw).unwrap(), parse_document(raw).unwrap());
        let bad = "<A><B></A>";
        let first = format!("{:?}", parse_document(bad).unwrap_err());
        let second = format!("{:?}", parse_document(bad).unwrap_err());
        assert_eq!(first, second);
    }
}
