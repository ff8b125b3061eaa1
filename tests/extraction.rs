use rollcall_wheel::{Attendance, Category, ColorTable, ExtractError, Extractor, KnownNames, extract};

/// Wraps a style block and body in the shape of a document export.
fn document(style: &str, body: &str) -> String {
    format!(
        "<html><head><meta content=\"text/html; charset=UTF-8\" http-equiv=\"content-type\">\
         <style type=\"text/css\">{style}</style></head><body class=\"c8 doc-content\">{body}</body></html>"
    )
}

const EXPORT_STYLE: &str = "ol{margin:0;padding:0}\
    .c1{color:#000000;font-weight:400;text-decoration:none;vertical-align:baseline;font-size:11pt;font-family:\"Arial\";font-style:normal}\
    .c3{color:#6aa84f;font-weight:400;font-size:11pt}\
    .c4{color:#38761d;font-weight:700}\
    .c5{background-color:#ffffff;max-width:451.4pt;padding:72pt 72pt 72pt 72pt}\
    .c6{color:#e69138;font-weight:400}\
    .c7{color:#cc0000;font-weight:400}\
    .c9{padding-top:0pt;padding-bottom:0pt;line-height:1.15;orphans:2;widows:2;text-align:left}\
    .title{padding-top:0pt;color:#6aa84f;font-size:26pt}";

#[test]
fn present_shade_goes_to_present() {
    let html = document(".c3{color:#6aa84f}", "<p><span class=\"c3\">Bram Verbelen</span></p>");
    let attendance = extract(html.as_bytes()).unwrap();
    assert_eq!(
        attendance,
        Attendance {
            present: vec!["Bram Verbelen".to_string()],
            excused: vec![],
            absent: vec![],
        }
    );
}

#[test]
fn excused_shade_goes_to_excused() {
    let html = document(".c2{color:#e69138}", "<p><span class=\"c2\">Lisa Corten</span></p>");
    let attendance = extract(html.as_bytes()).unwrap();
    assert_eq!(attendance.excused, vec!["Lisa Corten"]);
    assert_eq!(attendance.total(), 1);
}

#[test]
fn unmatched_class_falls_back_to_absent() {
    let html = document(".c3{color:#6aa84f}", "<p><span class=\"c12\">Oscar Peersman</span></p>");
    let attendance = extract(html.as_bytes()).unwrap();
    assert_eq!(attendance.absent, vec!["Oscar Peersman"]);
    assert!(attendance.present.is_empty());
    assert!(attendance.excused.is_empty());

    let html = document("", "<span>Oscar Peersman</span>");
    assert_eq!(extract(html.as_bytes()).unwrap().absent, vec!["Oscar Peersman"]);
}

#[test]
fn full_export_is_classified_in_document_order() {
    let body = "\
        <p class=\"c9\"><span class=\"c1\">Aanwezigheden 3 oktober</span></p>\
        <p class=\"c9\"><span class=\"c3\">Bram Verbelen</span></p>\
        <p class=\"c9\"><span class=\"c1 c4\">Emma Jans</span></p>\
        <p class=\"c9\"><span class=\"c6\">Lisa Corten</span></p>\
        <p class=\"c9\"><span class=\"c7\">Oscar Peersman</span></p>\
        <p class=\"c9\"><span class=\"c1\">Jef De Koker</span></p>\
        <p class=\"c9\"><span class=\"c5\">Kato Loeckx</span></p>\
        <p class=\"c9\"><span class=\"c4 c6\"> Robbe Serry </span></p>\
        <p class=\"c9\"><span class=\"c3\">Not A Student</span></p>\
        <p class=\"c9\"><span class=\"c3\"></span><span class=\"c3\">   </span></p>";
    let attendance = extract(document(EXPORT_STYLE, body).as_bytes()).unwrap();

    // c1 comes first in "c1 c4" and is black
    assert_eq!(attendance.present, vec!["Bram Verbelen", "Robbe Serry"]);
    assert_eq!(attendance.excused, vec!["Lisa Corten"]);
    assert_eq!(
        attendance.absent,
        vec!["Emma Jans", "Oscar Peersman", "Jef De Koker", "Kato Loeckx"]
    );
}

#[test]
fn duplicates_are_recorded_per_span() {
    let body = "<span class=\"c3\">Bram Verbelen</span>\
                <span class=\"c6\">Bram Verbelen</span>\
                <span class=\"c3\">Bram Verbelen</span>";
    let attendance = extract(document(EXPORT_STYLE, body).as_bytes()).unwrap();
    assert_eq!(attendance.present, vec!["Bram Verbelen", "Bram Verbelen"]);
    assert_eq!(attendance.excused, vec!["Bram Verbelen"]);
    assert_eq!(attendance.total(), 3);
}

#[test]
fn only_present_shades_means_only_present() {
    let roster = KnownNames::default();
    let names = ["Achille De Vriese", "Yannick Pâquet", "Amélie Niesten", "Wout Raspoet"];
    let body: String = names
        .iter()
        .enumerate()
        .map(|(i, n)| {
            let class = if i % 2 == 0 { "c3" } else { "c4" };
            format!("<p><span class=\"{class}\">{n}</span></p>")
        })
        .collect();
    let attendance = Extractor::new(roster, ColorTable::default())
        .extract(document(EXPORT_STYLE, &body).as_bytes())
        .unwrap();

    assert_eq!(attendance.present, names);
    assert!(attendance.excused.is_empty());
    assert!(attendance.absent.is_empty());
}

#[test]
fn several_style_blocks_are_combined() {
    let html = "<html><head><style>.c1{color:#6aa84f}</style><style>.c2{color:#e69138}</style></head>\
                <body><span class=\"c2\">Lisa Corten</span><span class=\"c1\">Emma Jans</span></body></html>";
    let attendance = extract(html.as_bytes()).unwrap();
    assert_eq!(attendance.present, vec!["Emma Jans"]);
    assert_eq!(attendance.excused, vec!["Lisa Corten"]);
}

#[test]
fn extraction_is_idempotent() {
    let body = "<span class=\"c3\">Bram Verbelen</span><span class=\"c6\">Lisa Corten</span>";
    let html = document(EXPORT_STYLE, body);
    let extractor = Extractor::default();
    let first = extractor.extract(html.as_bytes()).unwrap();
    let second = extractor.extract(html.as_bytes()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn custom_roster_and_colours() {
    let roster = KnownNames::from_names(["Ada Lovelace"]);
    let colors = ColorTable::from_pairs([("#0000ff", Category::Excused)]).unwrap();
    let html = document(
        ".c1{color:#0000FF}.c3{color:#6aa84f}",
        "<span class=\"c1\">Ada Lovelace</span><span class=\"c3\">Bram Verbelen</span>",
    );
    let attendance = Extractor::new(roster, colors).extract(html.as_bytes()).unwrap();
    assert_eq!(attendance.excused, vec!["Ada Lovelace"]);
    assert_eq!(attendance.total(), 1);
}

#[test]
fn malformed_markup_is_tolerated_but_bad_bytes_are_not() {
    let html = "<style>.c3{color:#6aa84f}<span class=c3>Bram Verbelen";
    assert!(extract(html.as_bytes()).is_ok());

    let mut bytes = document(EXPORT_STYLE, "<span class=\"c3\">Bram Verbelen</span>").into_bytes();
    bytes.push(0xc3);
    assert!(matches!(extract(&bytes), Err(ExtractError::Parse(_))));
}

#[test]
fn serialises_with_source_keys() {
    let html = document(EXPORT_STYLE, "<span class=\"c3\">Bram Verbelen</span>");
    let json = serde_json::to_value(extract(html.as_bytes()).unwrap()).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "aanwezig": ["Bram Verbelen"],
            "verontschuldigd": [],
            "afwezig": []
        })
    );
}
