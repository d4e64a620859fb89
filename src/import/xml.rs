//! Import parameter document
//!
//! The tool reads one `ImportParameters` document per new import area:
//!
//! ```xml
//! <ImportParameters bridgeId="CAS/AmazonS3__1.0" bridgeVersion="1.0_1.0" release="11.5.0.1" bridgeDisplayName="Amazon S3">
//!   <CompositeParameter isRequired="true" displayName="Data connection" id="DataConnection" type="DATA_CONNECTION">
//!     <Parameter displayName="Name" id="dcName_">
//!       <value>s3conn</value>
//!     </Parameter>
//!   </CompositeParameter>
//!   <Parameter displayName="Amazon S3 bucket" id="S3Bucket">
//!     <value>landing</value>
//!   </Parameter>
//! </ImportParameters>
//! ```

use std::fmt::Display;
use std::io::Cursor;

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

use super::{ImportError, ImportParam};
use crate::bridge::BridgeCatalog;

/// Tool release the parameter documents target
pub const RELEASE: &str = "11.5.0.1";

/// Parameter document for one bridge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportParameters {
    pub bridge_display_name: String,
    pub bridge_id: String,
    pub bridge_version: String,
    connection: Vec<ImportParam>,
    parameters: Vec<ImportParam>,
}

fn xml_error(e: impl Display) -> ImportError {
    ImportError::Xml(e.to_string())
}

impl ImportParameters {
    /// Start a document for a catalogued bridge
    pub fn new(bridge_name: &str) -> Result<Self, ImportError> {
        Ok(Self {
            bridge_display_name: bridge_name.to_string(),
            bridge_id: BridgeCatalog::bridge_id(bridge_name)?,
            bridge_version: BridgeCatalog::version(bridge_name)?.to_string(),
            connection: Vec::new(),
            parameters: Vec::new(),
        })
    }

    /// Add the data connection parameters
    pub fn add_data_connection(&mut self, params: impl IntoIterator<Item = ImportParam>) {
        self.connection.extend(params);
    }

    /// Add one bridge-specific parameter
    pub fn add_parameter(&mut self, param: ImportParam) {
        self.parameters.push(param);
    }

    pub fn connection(&self) -> &[ImportParam] {
        &self.connection
    }

    pub fn parameters(&self) -> &[ImportParam] {
        &self.parameters
    }

    /// Serialise the document, indented by two spaces
    pub fn to_xml(&self) -> Result<String, ImportError> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

        let mut root = BytesStart::new("ImportParameters");
        root.push_attribute(("bridgeId", self.bridge_id.as_str()));
        root.push_attribute(("bridgeVersion", self.bridge_version.as_str()));
        root.push_attribute(("release", RELEASE));
        root.push_attribute(("bridgeDisplayName", self.bridge_display_name.as_str()));
        writer.write_event(Event::Start(root)).map_err(xml_error)?;

        let mut composite = BytesStart::new("CompositeParameter");
        composite.push_attribute(("isRequired", "true"));
        composite.push_attribute(("displayName", "Data connection"));
        composite.push_attribute(("id", "DataConnection"));
        composite.push_attribute(("type", "DATA_CONNECTION"));
        writer.write_event(Event::Start(composite)).map_err(xml_error)?;
        for param in &self.connection {
            write_parameter(&mut writer, param)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new("CompositeParameter")))
            .map_err(xml_error)?;

        for param in &self.parameters {
            write_parameter(&mut writer, param)?;
        }

        writer
            .write_event(Event::End(BytesEnd::new("ImportParameters")))
            .map_err(xml_error)?;

        String::from_utf8(writer.into_inner().into_inner()).map_err(xml_error)
    }
}

fn write_parameter(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    param: &ImportParam,
) -> Result<(), ImportError> {
    let mut elem = BytesStart::new("Parameter");
    elem.push_attribute(("displayName", param.display_name.as_str()));
    elem.push_attribute(("id", param.id.as_str()));
    writer.write_event(Event::Start(elem)).map_err(xml_error)?;

    writer
        .write_event(Event::Start(BytesStart::new("value")))
        .map_err(xml_error)?;
    writer
        .write_event(Event::Text(BytesText::new(&param.value)))
        .map_err(xml_error)?;
    writer
        .write_event(Event::End(BytesEnd::new("value")))
        .map_err(xml_error)?;

    writer
        .write_event(Event::End(BytesEnd::new("Parameter")))
        .map_err(xml_error)?;
    Ok(())
}
