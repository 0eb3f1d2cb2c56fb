//! Whole-document validation of parsed configurations.

mod common;

use common::{document, loan_broker, parse};
use mule_config::schema::Cardinality;
use mule_config::validation::{Severity, ViolationKind};
use mule_config::{NodeKind, SchemaRegistry, Validator, ValidatorOptions};

const BROKEN: &str = r#"
    <connector name="jms"/>
    <transformers>
        <transformer name="ToString" className="org.mule.transformers.simple.ByteArrayToString"/>
        <transformer name="ToString" className="org.mule.transformers.simple.ObjectToString"/>
        <transformer name="To Bytes" className="org.mule.transformers.simple.StringToByteArray"/>
    </transformers>
    <global-endpoints>
        <endpoint name="Orders" address="jms://orders" connector="jms" transformers="ToString Missing"/>
    </global-endpoints>
    <model name="main">
        <mule-descriptor name="OrderService" implementation="org.example.OrderService" inboundEndpoint="Nowhere">
            <inbound-router>
                <endpoint ref="Orders" address="vm://orders"/>
                <global-endpoint name="Unknown"/>
            </inbound-router>
            <outbound-router>
                <router className="org.mule.routing.outbound.FilteringOutboundRouter">
                    <endpoint/>
                    <filter className="org.mule.routing.filters.logic.AndFilter">
                        <left-filter className="org.mule.routing.filters.WildcardFilter" pattern="a*"/>
                    </filter>
                </router>
            </outbound-router>
            <threading-profile maxThreadsActive="2" maxThreadsIdle="8"/>
        </mule-descriptor>
    </model>
"#;

fn codes(report: &mule_config::ValidationReport) -> Vec<&'static str> {
    report.iter().map(|violation| violation.kind.code()).collect()
}

#[test]
fn fixture_is_clean() {
    let report = Validator::standard().validate(&loan_broker());
    assert!(report.is_empty(), "unexpected findings: {:?}", report.violations());
    assert!(report.is_valid());
}

#[test]
fn every_problem_is_reported_in_one_pass() {
    let report = Validator::standard().validate(&parse(&document(BROKEN)));
    let codes = codes(&report);

    for expected in [
        "missing_required_attribute",
        "unresolved_reference",
        "duplicate_name",
        "ambiguous_endpoint_definition",
        "invalid_filter_composition",
        "profile_bounds",
        "invalid_name",
    ] {
        assert!(codes.contains(&expected), "missing {} in {:?}", expected, codes);
    }
    assert!(!report.is_valid());
}

#[test]
fn unresolved_references_name_their_attribute() {
    let report = Validator::standard().validate(&parse(&document(BROKEN)));
    let mut unresolved: Vec<(String, String)> = report
        .with_code("unresolved_reference")
        .filter_map(|violation| match &violation.kind {
            ViolationKind::UnresolvedReference { name, attribute, .. } => Some((attribute.clone(), name.clone())),
            _ => None,
        })
        .collect();
    unresolved.sort();

    assert_eq!(
        unresolved,
        vec![
            ("inboundEndpoint".to_string(), "Nowhere".to_string()),
            ("name".to_string(), "Unknown".to_string()),
            ("transformers".to_string(), "Missing".to_string()),
        ]
    );
}

#[test]
fn findings_carry_node_paths() {
    let report = Validator::standard().validate(&parse(&document(BROKEN)));
    let paths: Vec<String> = report.iter().map(|violation| violation.path.to_string()).collect();

    assert!(paths.contains(&"mule-configuration/connector[0]".to_string()));
    assert!(paths.contains(&"mule-configuration/transformers/transformer[1]".to_string()));
    assert!(paths
        .iter()
        .any(|path| path == "mule-configuration/model/mule-descriptor[0]/inbound-router/endpoint[0]"));
}

#[test]
fn endpoint_without_address_or_ref_is_reported() {
    let report = Validator::standard().validate(&parse(&document(BROKEN)));
    assert!(report.iter().any(|violation| matches!(
        &violation.kind,
        ViolationKind::MissingRequiredAttribute { kind: NodeKind::Endpoint, attribute } if attribute == "address or ref"
    )));
}

#[test]
fn each_malformed_sub_filter_is_reported() {
    let text = document(
        r#"<global-endpoints>
            <endpoint name="Screened" address="vm://screened">
                <filter className="org.mule.routing.filters.logic.AndFilter">
                    <left-filter className="org.mule.routing.filters.logic.NotFilter"/>
                    <right-filter className="org.mule.routing.filters.logic.OrFilter"/>
                </filter>
            </endpoint>
        </global-endpoints>"#,
    );
    let report = Validator::standard().validate(&parse(&text));
    let reasons: Vec<String> = report
        .with_code("invalid_filter_composition")
        .filter_map(|violation| match &violation.kind {
            ViolationKind::InvalidFilterComposition { reason } => Some(reason.clone()),
            _ => None,
        })
        .collect();

    assert_eq!(
        reasons,
        vec![
            "org.mule.routing.filters.logic.NotFilter requires a 'filter' operand".to_string(),
            "org.mule.routing.filters.logic.OrFilter requires a 'left-filter' operand".to_string(),
        ]
    );
}

#[test]
fn warnings_do_not_invalidate_by_default() {
    let text = document(
        r#"<transformers><transformer name="To String" className="org.mule.transformers.simple.ObjectToString"/></transformers>"#,
    );
    let doc = parse(&text);

    let report = Validator::standard().validate(&doc);
    assert_eq!(report.warning_count(), 1);
    assert!(report.is_valid());
    assert_eq!(report.violations()[0].severity, Severity::Warning);

    let strict = Validator::standard()
        .with_options(ValidatorOptions { warnings_as_errors: true, ..ValidatorOptions::default() })
        .validate(&doc);
    assert!(!strict.is_valid());
    assert_eq!(strict.error_count(), 1);
}

#[test]
fn profile_bounds_can_be_disabled() {
    let text = document(
        r#"<mule-environment-properties><threading-profile maxThreadsActive="1" maxThreadsIdle="4"/></mule-environment-properties>"#,
    );
    let doc = parse(&text);

    assert_eq!(Validator::standard().validate(&doc).with_code("profile_bounds").count(), 1);
    let relaxed = Validator::standard()
        .with_options(ValidatorOptions { check_profile_bounds: false, ..ValidatorOptions::default() })
        .validate(&doc);
    assert!(relaxed.is_empty());
}

#[test]
fn registry_overrides_require_elements() {
    let registry = SchemaRegistry::standard().clone().with_cardinality(
        NodeKind::MuleConfiguration,
        "model",
        Cardinality::One,
    );
    let doc = parse(&document(""));

    assert!(Validator::standard().validate(&doc).is_valid());
    let report = Validator::new(&registry).validate(&doc);
    assert_eq!(codes(&report), vec!["missing_required_element"]);
}

#[test]
fn report_serializes_with_summary_counts() {
    let report = Validator::standard().validate(&parse(&document(BROKEN)));
    let json = serde_json::to_value(&report).expect("serialize");
    assert_eq!(json["valid"], false);
    assert_eq!(json["errors"].as_u64(), Some(report.error_count() as u64));
    assert!(json["violations"].as_array().is_some_and(|violations| !violations.is_empty()));
    assert!(json["violations"][0]["path"].is_string());
}
