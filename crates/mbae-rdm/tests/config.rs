use mbae_core::OpSig;
use mbae_rdm::RdmConfig;

#[test]
fn empty_document_yields_defaults() {
    let config: RdmConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config, RdmConfig::default());
    assert_eq!(config.ranksigs, vec!["2200".to_string()]);
    assert_eq!(config.buffers.grow_factor, 1.5);
    assert_eq!(config.norm_tolerance, 1e-6);
}

#[test]
fn partial_documents_fill_in_missing_fields() {
    let config: RdmConfig = serde_json::from_str(
        r#"{"ranksigs": ["1100", "2200"], "buffers": {"grow_factor": 2.0}}"#,
    )
    .unwrap();
    assert_eq!(config.ranksigs.len(), 2);
    assert_eq!(config.buffers.grow_factor, 2.0);
    assert_eq!(config.buffers.store_row_estimate_factor, 1.0);
    assert_eq!(config.norm_tolerance, 1e-6);
}

#[test]
fn ranksig_strings_parse_to_signatures() {
    let config = RdmConfig {
        ranksigs: vec!["1100".to_string(), "0011".to_string()],
        ..RdmConfig::default()
    };
    let sigs = config.parse_ranksigs().unwrap();
    assert_eq!(sigs, vec![OpSig::frm(1).unwrap(), OpSig::parse("0011").unwrap()]);
}

#[test]
fn out_of_range_and_malformed_ranksigs_are_rejected() {
    for text in ["9900", "220", "22000", "2a00"] {
        let config = RdmConfig {
            ranksigs: vec![text.to_string()],
            ..RdmConfig::default()
        };
        let err = config.parse_ranksigs().unwrap_err();
        assert_eq!(err.info().code, "ranksig-unparseable", "ranksig {text}");
    }
}
