//! Import area tests against a scripted import tool

use std::cell::RefCell;

use chrono::NaiveDateTime;
use imam_cli::config::{ConfigError, EnvironmentContext};
use imam_cli::import::{
    CommandOutput, CommandRunner, ImamClient, ImportError, ImportParam, ImportRequest,
    RefreshOutcome, RefreshPolicy,
};
use imam_cli::template::{Cell, TemplateError, Workbook, build_template};

const LIST_OUTPUT: &str = "\
Import Areas
==========================================================================
SALES_DB2    | 2016-10-24 14:31:22 | 2016-10-24     | 2016-10-24 14:40:01 | 2016-10-24 14:45:00
             |                     | 14:35:10       |                     |
__________________________________________________________________________
LANDING_     | 2016-10-20 09:00:00 |                |                     |
FILES        |                     |                |                     |
__________________________________________________________________________
";

/// Answers import tool calls from fixed responses and records every command
struct ScriptedRunner {
    calls: RefCell<Vec<String>>,
    import_code: i32,
    failing_area: Option<&'static str>,
}

impl ScriptedRunner {
    fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            import_code: 0,
            failing_area: None,
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, command: &str) -> Result<CommandOutput, ImportError> {
        self.calls.borrow_mut().push(command.to_string());
        if command.contains("encrypt.sh") {
            return Ok(CommandOutput::new(0, "{ENCRYPTED}c2VjcmV0\n"));
        }
        if command.contains("-a list -t area") {
            return Ok(CommandOutput::new(0, LIST_OUTPUT));
        }
        if command.contains("-a import") {
            return Ok(CommandOutput::new(self.import_code, "import finished"));
        }
        if let Some(area) = self.failing_area
            && command.contains(&format!("-a reimport -i \"{}\"", area))
        {
            return Ok(CommandOutput::new(2, "reimport failed"));
        }
        Ok(CommandOutput::new(0, "ok"))
    }
}

fn context() -> EnvironmentContext {
    EnvironmentContext::new()
        .with_auth_file("/home/dsadm/.imam/auth.cfg")
        .with_engine("ENGINE.EXAMPLE.COM")
}

fn at(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
}

fn s3_request(area_name: &str) -> ImportRequest {
    ImportRequest {
        bridge_name: "Amazon S3".to_string(),
        area_name: area_name.to_string(),
        description: "New S3 area".to_string(),
        connection: vec![
            ImportParam::new("dcName_", "Name", "s3conn"),
            ImportParam::new("Password", "Secret key", "s3cr3t"),
        ],
        parameters: vec![ImportParam::new("S3Bucket", "Amazon S3 bucket", "landing")],
    }
}

mod client_tests {
    use super::*;

    #[test]
    fn test_call_requires_auth_file() {
        let runner = ScriptedRunner::new();
        let client = ImamClient::new(EnvironmentContext::new(), &runner);
        assert!(matches!(
            client.list_import_areas(),
            Err(ImportError::Config(ConfigError::Missing("auth_file")))
        ));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_list_import_areas() {
        let runner = ScriptedRunner::new();
        let client = ImamClient::new(context(), &runner);
        let areas = client.list_import_areas().unwrap();

        assert_eq!(
            runner.calls(),
            vec![
                "\"/opt/IBM/InformationServer/ASBNode/bin/imam.sh\" -af \"/home/dsadm/.imam/auth.cfg\" -a list -t area"
                    .to_string()
            ]
        );
        assert_eq!(areas.len(), 2);
        assert_eq!(areas["SALES_DB2"].analysis, Some(at("2016-10-24 14:35:10")));
        assert_eq!(areas["LANDING_FILES"].import, Some(at("2016-10-20 09:00:00")));
        assert_eq!(areas["LANDING_FILES"].share, None);
    }

    #[test]
    fn test_paths_with_spaces_are_quoted() {
        let runner = ScriptedRunner::new();
        let mut context = context().with_auth_file("/home/ds adm/auth $HOME.cfg");
        context.asb_home = "/opt/IBM Info/ASBNode".into();
        let client = ImamClient::new(context, &runner);

        client.create_or_update_import_area(&s3_request("NEW AREA")).unwrap();

        let calls = runner.calls();
        assert_eq!(
            calls[0],
            "\"/opt/IBM Info/ASBNode/bin/imam.sh\" -af \"/home/ds adm/auth \\$HOME.cfg\" -a list -t area"
        );
        assert_eq!(calls[1], "\"/opt/IBM Info/ASBNode/bin/encrypt.sh\" \"s3cr3t\"");
        assert!(calls[2].starts_with(
            "\"/opt/IBM Info/ASBNode/bin/imam.sh\" -af \"/home/ds adm/auth \\$HOME.cfg\" -mn engine.example.com -a import"
        ));
    }

    #[test]
    fn test_existing_area_is_reimported() {
        let runner = ScriptedRunner::new();
        let client = ImamClient::new(context(), &runner);
        let mut request = s3_request("SALES_DB2");
        request.bridge_name = "IBM InfoSphere DB2 Connector".to_string();

        let output = client.create_or_update_import_area(&request).unwrap();
        assert!(output.success());

        let calls = runner.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[1].ends_with("-a reimport -i \"SALES_DB2\""));
        assert!(!calls[1].contains("-mn"));
    }

    #[test]
    fn test_new_area_created_with_encrypted_password() {
        let runner = ScriptedRunner {
            import_code: 1,
            ..ScriptedRunner::new()
        };
        let client = ImamClient::new(context(), &runner);
        let area = "IT S3 kept params";

        let output = client.create_or_update_import_area(&s3_request(area)).unwrap();
        assert_eq!(output.code, 1);

        let calls = runner.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(
            calls[1],
            "\"/opt/IBM/InformationServer/ASBNode/bin/encrypt.sh\" \"s3cr3t\""
        );
        let import = &calls[2];
        assert!(import.contains("-mn engine.example.com -a import -i \"IT S3 kept params\""));
        assert!(import.contains("-ad \"New S3 area\""));
        assert!(import.contains("-id \"Initial import on "));

        // A failed import leaves the parameter file for inspection
        let param_file = std::env::temp_dir().join("IT_S3_kept_params.xml");
        let xml = std::fs::read_to_string(&param_file).unwrap();
        std::fs::remove_file(&param_file).unwrap();

        assert!(xml.contains("bridgeId=\"CAS/AmazonS3__1.0\""));
        assert!(xml.contains("{ENCRYPTED}c2VjcmV0"));
        assert!(!xml.contains("s3cr3t"));
        assert!(xml.contains("<value>landing</value>"));
    }

    #[test]
    fn test_param_file_removed_after_successful_import() {
        let runner = ScriptedRunner::new();
        let client = ImamClient::new(context(), &runner);

        let output = client
            .create_or_update_import_area(&s3_request("IT S3 removed params"))
            .unwrap();
        assert!(output.success());
        assert!(!std::env::temp_dir().join("IT_S3_removed_params.xml").exists());
    }

    #[test]
    fn test_import_requires_engine() {
        let runner = ScriptedRunner::new();
        let context = EnvironmentContext::new().with_auth_file("/home/dsadm/.imam/auth.cfg");
        let client = ImamClient::new(context, &runner);

        let err = client
            .create_or_update_import_area(&s3_request("IT S3 no engine"))
            .unwrap_err();
        assert!(matches!(err, ImportError::Config(ConfigError::Missing("engine"))));
        let _ = std::fs::remove_file(std::env::temp_dir().join("IT_S3_no_engine.xml"));
    }

    #[test]
    fn test_unknown_bridge() {
        let runner = ScriptedRunner::new();
        let client = ImamClient::new(context(), &runner);
        let mut request = s3_request("IT pigeon");
        request.bridge_name = "Carrier Pigeon".to_string();
        assert!(matches!(
            client.create_or_update_import_area(&request),
            Err(ImportError::Bridge(_))
        ));
    }
}

mod refresh_tests {
    use super::*;

    #[test]
    fn test_refresh_skips_recently_shared_areas() {
        let runner = ScriptedRunner::new();
        let client = ImamClient::new(context(), &runner);
        let policy = RefreshPolicy {
            stale_hours: Some(2),
            ..RefreshPolicy::default()
        };

        let reports = client
            .refresh_import_areas(None, &policy, at("2016-10-24 16:00:00"))
            .unwrap();
        assert_eq!(reports.len(), 2);

        let landing = reports.iter().find(|r| r.area == "LANDING_FILES").unwrap();
        assert!(matches!(landing.outcome, RefreshOutcome::Refreshed(_)));
        let sales = reports.iter().find(|r| r.area == "SALES_DB2").unwrap();
        assert_eq!(sales.outcome, RefreshOutcome::Skipped(at("2016-10-24 14:45:00")));
    }

    #[test]
    fn test_refresh_without_hours_refreshes_everything() {
        let runner = ScriptedRunner::new();
        let client = ImamClient::new(context(), &runner);

        let reports = client
            .refresh_import_areas(None, &RefreshPolicy::default(), at("2016-10-24 16:00:00"))
            .unwrap();
        assert!(
            reports
                .iter()
                .all(|r| matches!(r.outcome, RefreshOutcome::Refreshed(_)))
        );
    }

    #[test]
    fn test_refresh_continues_after_failure() {
        let runner = ScriptedRunner {
            failing_area: Some("LANDING_FILES"),
            ..ScriptedRunner::new()
        };
        let client = ImamClient::new(context(), &runner);

        let reports = client
            .refresh_import_areas(None, &RefreshPolicy::default(), at("2016-10-24 16:00:00"))
            .unwrap();
        assert_eq!(reports.len(), 2);
        assert!(matches!(
            &reports.iter().find(|r| r.area == "LANDING_FILES").unwrap().outcome,
            RefreshOutcome::Failed(output) if output.code == 2
        ));
        assert!(matches!(
            reports.iter().find(|r| r.area == "SALES_DB2").unwrap().outcome,
            RefreshOutcome::Refreshed(_)
        ));
    }

    #[test]
    fn test_refresh_stops_on_failure_when_asked() {
        let runner = ScriptedRunner {
            failing_area: Some("LANDING_FILES"),
            ..ScriptedRunner::new()
        };
        let client = ImamClient::new(context(), &runner);
        let policy = RefreshPolicy {
            stale_hours: None,
            continue_on_error: false,
        };

        let err = client
            .refresh_import_areas(None, &policy, at("2016-10-24 16:00:00"))
            .unwrap_err();
        assert!(matches!(err, ImportError::CommandFailed { code: 2, .. }));
    }

    #[test]
    fn test_refresh_single_and_unknown_area() {
        let runner = ScriptedRunner::new();
        let client = ImamClient::new(context(), &runner);
        let now = at("2016-10-24 16:00:00");

        let reports = client
            .refresh_import_areas(Some("SALES_DB2"), &RefreshPolicy::default(), now)
            .unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].area, "SALES_DB2");

        let err = client
            .refresh_import_areas(Some("NOPE"), &RefreshPolicy::default(), now)
            .unwrap_err();
        assert!(matches!(err, ImportError::UnknownImportArea(ref name) if name == "NOPE"));
        assert_eq!(
            err.to_string(),
            "No import area exists with the name 'NOPE'."
        );
    }

    #[test]
    fn test_refresh_rejects_out_of_range_stale_period() {
        let runner = ScriptedRunner::new();
        let client = ImamClient::new(context(), &runner);
        let policy = RefreshPolicy {
            stale_hours: Some(3_000_000_000),
            ..RefreshPolicy::default()
        };

        let err = client
            .refresh_import_areas(None, &policy, at("2016-10-24 16:00:00"))
            .unwrap_err();
        assert!(matches!(err, ImportError::InvalidStalePeriod(3_000_000_000)));
        assert_eq!(err.to_string(), "Stale period of 3000000000 hours is out of range");
        assert!(runner.calls().is_empty());
    }
}

mod load_metadata_tests {
    use super::*;

    #[test]
    fn test_load_metadata_reports_each_row() {
        let mut sheet = build_template("IBM InfoSphere DB2 Connector").unwrap();
        let column = |id: &str| {
            (1..=sheet.column_count())
                .find(|c| sheet.value(1, *c) == Some(id))
                .unwrap()
        };
        let (name, db, host) = (column("IA_name"), column("DCN_Database"), column("P_AP_Host system name"));

        sheet.set(4, name, Cell::text("SALES_DB2"));
        sheet.set(4, db, Cell::text("SALES"));
        sheet.set(4, host, Cell::text("dbhost"));
        sheet.set(5, db, Cell::text("HR"));

        let mut workbook = Workbook::new();
        workbook.add_sheet(sheet);

        let runner = ScriptedRunner::new();
        let client = ImamClient::new(context(), &runner);
        let outcomes = client.load_metadata(&workbook);

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].sheet, "IBM InfoSphere DB2 Connector");
        assert_eq!(outcomes[0].row, 4);
        assert!(outcomes[0].result.as_ref().unwrap().success());
        assert!(matches!(
            outcomes[1].result,
            Err(ImportError::Template(TemplateError::MissingAreaName { row: 5, .. }))
        ));

        let calls = runner.calls();
        assert!(calls.last().unwrap().ends_with("-a reimport -i \"SALES_DB2\""));
    }
}
