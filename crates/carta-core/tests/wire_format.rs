//! The `{do, undo}` operation records as other processes see them.

use std::sync::Arc;

use carta_core::{
    Article, Attrs, ComponentId, ComponentKind, ComponentUpdate, Format, FormatType, Loader,
    NewComponent, Operation, Paragraph, Section,
};

fn article() -> Article {
    let section = NewComponent::new(ComponentKind::Section(Section::default()))
        .with_name("s")
        .with_children(vec![
            NewComponent::paragraph(
                Paragraph::new("hello world")
                    .with_formats(vec![Format::new(FormatType::Bold, 0, 5)]),
            )
            .with_name("p1"),
        ]);
    Article::from_components(Arc::new(Loader::default()), "doc".into(), vec![section]).unwrap()
}

#[test]
fn test_remove_chars_record() {
    let article = article();
    let ops = article
        .tree()
        .remove_chars_ops(&ComponentId::new("p1"), 0, 6)
        .unwrap();
    insta::assert_json_snapshot!(ops, @r###"
    [
      {
        "do": {
          "op": "removeChars",
          "component": "p1",
          "index": 0,
          "count": 6,
          "cursorOffset": 0
        },
        "undo": {
          "op": "insertChars",
          "component": "p1",
          "index": 0,
          "value": "hello ",
          "formats": [
            {
              "type": "strong",
              "from": 0,
              "to": 5
            }
          ],
          "cursorOffset": 6
        }
      }
    ]
    "###);
}

#[test]
fn test_records_parse_back() {
    let article = article();
    let mut attrs = Attrs::new();
    attrs.insert("paragraphType".into(), "h2".into());
    let ops = article
        .tree()
        .update_ops(
            &ComponentId::new("p1"),
            ComponentUpdate {
                attrs: Some(attrs),
                ..ComponentUpdate::default()
            },
        )
        .unwrap();
    let json = serde_json::to_string(&ops).unwrap();
    let parsed: Vec<Operation> = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, ops);
    assert!(json.contains(r#""op":"updateComponent""#));
    assert!(json.contains(r#""undo":{"op":"updateComponent","component":"p1","attrs":{"paragraphType":"p"}"#));
}
