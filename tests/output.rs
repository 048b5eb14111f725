use webin_sample_client::output::render_sample;
use webin_sample_client::reference::{Attribute, Sample};

#[test]
fn render_sample_text() {
    let mut sample = Sample {
        name: "S1".to_string(),
        tax_id: Some(9606),
        organism: Some("Homo sapiens".to_string()),
        attributes: Vec::new(),
    };
    sample.add_attribute(Attribute::new(
        "host age",
        Some("42".to_string()),
        None,
        Some("years".to_string()),
        None,
    ));
    sample.add_attribute(Attribute::new("ENA-CHECKLIST", None, None, None, None));

    assert_eq!(
        render_sample(&sample),
        "name: S1\ntaxon: 9606\norganism: Homo sapiens\nattributes:\n  host age = 42 years\n  ENA-CHECKLIST\n"
    );
}

#[test]
fn render_sample_json_shape() {
    let sample = Sample {
        name: "S1".to_string(),
        tax_id: None,
        organism: None,
        attributes: vec![Attribute::new("strain", None, None, None, None)],
    };
    let json = serde_json::to_value(&sample).unwrap();
    assert_eq!(json["name"], "S1");
    assert!(json["tax_id"].is_null());
    assert_eq!(json["attributes"][0]["tag"], "strain");
}
