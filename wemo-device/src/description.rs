//! UPnP device description parsing.
//!
//! A description document is walked as a tree of local tag names: `xmltree`
//! splits namespace URIs off at parse time, so dispatch happens on the bare
//! tag. The `device` element's children are copied verbatim into a map,
//! except `serviceList`, whose `<service>` children are each flattened into
//! one entry of their own.

use std::collections::BTreeMap;

use xmltree::Element;

/// Flattened tag -> text mapping of one `<service>` element.
pub type ServiceInfo = BTreeMap<String, String>;

/// Metadata parsed from a device's description XML.
///
/// Populated once when a handle is constructed; an empty descriptor means
/// the description could not be fetched or parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceDescriptor {
    /// Immediate children of the `device` element, local tag -> text
    pub fields: BTreeMap<String, String>,
    /// One entry per `<service>` element, in document order
    pub services: Vec<ServiceInfo>,
}

impl DeviceDescriptor {
    /// Parse a UPnP device description document.
    ///
    /// Returns `None` when the XML is malformed or contains no `device`
    /// element.
    pub fn from_xml(xml: &str) -> Option<Self> {
        let root = Element::parse(xml.as_bytes()).ok()?;
        let device = find_child(&root, "device")?;
        Some(Self::from_device_element(device))
    }

    fn from_device_element(device: &Element) -> Self {
        let mut fields = BTreeMap::new();
        let mut services = Vec::new();

        for child in child_elements(device) {
            if child.name == "serviceList" {
                services.extend(child_elements(child).map(flatten_service));
            } else {
                fields.insert(child.name.clone(), text_of(child));
            }
        }

        Self { fields, services }
    }

    /// Friendly name from the description, if one was present.
    pub fn friendly_name(&self) -> Option<&str> {
        self.fields.get("friendlyName").map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.services.is_empty()
    }
}

fn child_elements(el: &Element) -> impl Iterator<Item = &Element> {
    el.children.iter().filter_map(|node| node.as_element())
}

fn find_child<'a>(el: &'a Element, local_name: &str) -> Option<&'a Element> {
    child_elements(el).find(|c| c.name == local_name)
}

fn text_of(el: &Element) -> String {
    el.get_text().map(|t| t.into_owned()).unwrap_or_default()
}

fn flatten_service(service: &Element) -> ServiceInfo {
    child_elements(service)
        .map(|node| (node.name.clone(), text_of(node)))
        .collect()
}
