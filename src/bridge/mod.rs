//! Bridge catalog
//!
//! Static description of the metadata bridges the import tool offers: which
//! kind of asset each one imports, the identifiers the tool expects in a
//! parameter document, and the connector and bridge parameters a template
//! must collect. Only the bridges in [`BridgeCatalog::implemented`] carry
//! parameter definitions; the others are recognised by name only.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by catalog lookups
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    #[error("Unable to find a bridge named '{0}'.")]
    UnknownBridge(String),

    #[error("Bridge '{0}' is recognised but not implemented")]
    NotImplemented(String),
}

/// Kind of asset a bridge imports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    File,
    Database,
}

/// Value kind of a bridge parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ParamKind {
    Text,
    Boolean,
}

/// One parameter the import tool accepts for a bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParamSpec {
    pub id: &'static str,
    pub display_name: &'static str,
    pub required: bool,
    pub kind: ParamKind,
    pub default: Option<&'static str>,
}

const fn text(id: &'static str, display_name: &'static str) -> ParamSpec {
    ParamSpec {
        id,
        display_name,
        required: false,
        kind: ParamKind::Text,
        default: None,
    }
}

const fn required(id: &'static str, display_name: &'static str) -> ParamSpec {
    ParamSpec {
        id,
        display_name,
        required: true,
        kind: ParamKind::Text,
        default: None,
    }
}

const fn flag(id: &'static str, display_name: &'static str, default: &'static str) -> ParamSpec {
    ParamSpec {
        id,
        display_name,
        required: false,
        kind: ParamKind::Boolean,
        default: Some(default),
    }
}

const fn with_default(spec: ParamSpec, default: &'static str) -> ParamSpec {
    ParamSpec {
        default: Some(default),
        ..spec
    }
}

/// Parameter whose example cell offers a fixed list of values
pub const ASSET_DESCRIPTION_PARAM: &str = "Asset_description_already_exists";

/// Choices offered for [`ASSET_DESCRIPTION_PARAM`]
pub const ASSET_DESCRIPTION_CHOICES: [&str; 2] =
    ["Replace_existing_description", "Keep_existing_description"];

const ASSET_DESCRIPTION: ParamSpec = with_default(
    text(
        ASSET_DESCRIPTION_PARAM,
        "If an asset description already exists",
    ),
    "Replace_existing_description",
);

/// Full description of one bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BridgeSpec {
    pub name: &'static str,
    pub asset_type: AssetType,
    /// Tool-side identifier, empty when not implemented
    pub id: &'static str,
    /// `{bridge version}_{release}`, empty when not implemented
    pub version: &'static str,
    pub connector_params: &'static [ParamSpec],
    pub bridge_params: &'static [ParamSpec],
}

impl BridgeSpec {
    pub fn is_implemented(&self) -> bool {
        !self.id.is_empty() && !self.version.is_empty()
    }
}

const fn recognised(name: &'static str, asset_type: AssetType) -> BridgeSpec {
    BridgeSpec {
        name,
        asset_type,
        id: "",
        version: "",
        connector_params: &[],
        bridge_params: &[],
    }
}

const AMAZON_S3: BridgeSpec = BridgeSpec {
    name: "Amazon S3",
    asset_type: AssetType::File,
    id: "CAS/AmazonS3",
    version: "1.0_1.0",
    connector_params: &[
        required("dcName_", "Name"),
        required("dcDescription_", "Description"),
        text("Region", "Region"),
        flag("UseCredentialsFile", "Use credentials file", "true"),
        required("CredentialsFile", "Credentials file"),
        required("Username", "Access key"),
        required("Password", "Secret key"),
    ],
    bridge_params: &[
        required("S3Bucket", "Amazon S3 bucket"),
        text("S3BucketContents", "S3 bucket contents"),
        flag("ImportFileStructure", "Import file structure", "True"),
        flag(
            "IgnoreMetadataAccessErrors",
            "Ignore metadata access errors",
            "False",
        ),
        ASSET_DESCRIPTION,
        required("AP_Host system name", "Host system name"),
    ],
};

const DB2_CONNECTOR: BridgeSpec = BridgeSpec {
    name: "IBM InfoSphere DB2 Connector",
    asset_type: AssetType::Database,
    id: "CAS/DB2Connector",
    version: "9.1_1.0",
    connector_params: &[
        required("dcName_", "Name"),
        text("dcDescription_", "Description"),
        required("Database", "Database"),
        text("Username", "User name"),
        text("Password", "Password"),
        text("Instance", "Instance"),
    ],
    bridge_params: &[
        flag("includeTables", "Include tables", "True"),
        flag("includeViews", "Include views", "True"),
        flag("includeNicknames", "Include nicknames", "True"),
        flag("includeAliases", "Include aliases", "True"),
        flag("importXmlAsLob", "XML columns as LOBs", "True"),
        flag("IncludeSystemObjects", "Include system objects", "False"),
        flag(
            "ImportAssetsAsDatabases",
            "Import assets as\ndatabases from z/OS",
            "False",
        ),
        text("SchemaNameFilter", "Schema name filter"),
        flag(
            "UseRegexInSchemaNameFilter",
            "Use regular expression in schema\nname filter",
            "False",
        ),
        text("TableNameFilter", "Table name filter"),
        text("AssetsToImport", "Assets to import"),
        ASSET_DESCRIPTION,
        flag("IgnoreTableAccessErrors", "Ignore table access\nerrors", "False"),
        required("AP_Host system name", "Host system name"),
        text("AP_Database name", "Database name"),
    ],
};

const FILE_ENGINE_TIER: BridgeSpec = BridgeSpec {
    name: "File Connector - Engine Tier",
    asset_type: AssetType::File,
    id: "CAS/LocalFileConnector",
    version: "1.6_1.0",
    connector_params: &[
        required("dcName_", "Name"),
        text("dcDescription_", "Description"),
    ],
    bridge_params: &[
        text("DirectoryContents", "Assets to import"),
        flag("ImportFileStructure", "Import file structure", "True"),
        flag("IgnoreAccessError", "Ignore metadata access errors", "False"),
        ASSET_DESCRIPTION,
        required("Identity_HostSystem", "Host system name"),
    ],
};

const FILE_HDFS: BridgeSpec = BridgeSpec {
    name: "File Connector - HDFS",
    asset_type: AssetType::File,
    id: "CAS/HDFSFileConnector",
    version: "1.6_1.0",
    connector_params: &[
        required("dcName_", "Name"),
        text("dcDescription_", "Description"),
        // 1 = WebHDFS
        with_default(required("FileSystem", "File system"), "1"),
        flag("ssl", "Use SSL (HTTPS)", "false"),
        flag("Kerberos", "Use Kerberos", "false"),
        flag("UseKeytab", "Use keytab", "false"),
        text("Keytab", "Keytab"),
        flag("UseCustomURL", "Use custom URL", "false"),
        text("CustomURL", "Custom URL"),
        required("Host", "Host"),
        text("Port", "Port"),
        required("Username", "User name"),
        required("Password", "Password"),
    ],
    bridge_params: &[
        text("DirectoryContents", "Assets to import"),
        flag("ImportFileStructure", "Import file structure", "False"),
        flag("IgnoreAccessError", "Ignore metadata access errors", "false"),
        ASSET_DESCRIPTION,
        required("Identity_HostSystem", "Host system name"),
    ],
};

static BRIDGES: [BridgeSpec; 18] = [
    AMAZON_S3,
    FILE_ENGINE_TIER,
    FILE_HDFS,
    recognised("HDFS", AssetType::File),
    recognised("Hive Connector", AssetType::Database),
    recognised("IBM Cognos TM1", AssetType::Database),
    recognised("IBM Cognos TM1 Connector", AssetType::Database),
    DB2_CONNECTOR,
    recognised("IBM InfoSphere Master Data Management", AssetType::Database),
    recognised("IBM InfoSphere Streams", AssetType::File),
    recognised("IBM Netezza Connector", AssetType::Database),
    recognised("JDBC Connector", AssetType::Database),
    recognised("ODBC Connector", AssetType::Database),
    recognised("XSD", AssetType::File),
    recognised("Oracle Connector 11g", AssetType::Database),
    recognised("Oracle Connector 12c", AssetType::Database),
    recognised("Greenplum connector", AssetType::Database),
    recognised("Teradata Connector", AssetType::Database),
];

/// Lookups over the static bridge tables
pub struct BridgeCatalog;

impl BridgeCatalog {
    /// Bridges with full parameter definitions, in template order
    pub fn implemented() -> Vec<&'static str> {
        vec![
            AMAZON_S3.name,
            DB2_CONNECTOR.name,
            FILE_ENGINE_TIER.name,
            FILE_HDFS.name,
        ]
    }

    /// Every recognised bridge name
    pub fn known() -> impl Iterator<Item = &'static str> {
        BRIDGES.iter().map(|b| b.name)
    }

    /// Look up any recognised bridge
    pub fn get(bridge_name: &str) -> Result<&'static BridgeSpec, BridgeError> {
        BRIDGES
            .iter()
            .find(|b| b.name == bridge_name)
            .ok_or_else(|| BridgeError::UnknownBridge(bridge_name.to_string()))
    }

    /// Look up a bridge that has parameter definitions
    pub fn get_implemented(bridge_name: &str) -> Result<&'static BridgeSpec, BridgeError> {
        let spec = Self::get(bridge_name)?;
        if spec.is_implemented() {
            Ok(spec)
        } else {
            Err(BridgeError::NotImplemented(bridge_name.to_string()))
        }
    }

    pub fn asset_type(bridge_name: &str) -> Result<AssetType, BridgeError> {
        Ok(Self::get(bridge_name)?.asset_type)
    }

    pub fn version(bridge_name: &str) -> Result<&'static str, BridgeError> {
        Ok(Self::get_implemented(bridge_name)?.version)
    }

    /// Tool-side bridge id: `{id}__{bridge version}`, e.g. `CAS/AmazonS3__1.0`
    pub fn bridge_id(bridge_name: &str) -> Result<String, BridgeError> {
        let spec = Self::get_implemented(bridge_name)?;
        let bridge_version = spec
            .version
            .split_once('_')
            .map_or(spec.version, |(v, _)| v);
        Ok(format!("{}__{}", spec.id, bridge_version))
    }

    pub fn connector_params(bridge_name: &str) -> Result<&'static [ParamSpec], BridgeError> {
        Ok(Self::get_implemented(bridge_name)?.connector_params)
    }

    pub fn bridge_params(bridge_name: &str) -> Result<&'static [ParamSpec], BridgeError> {
        Ok(Self::get_implemented(bridge_name)?.bridge_params)
    }
}
