use serde_json::json;

use crate::query::{Direction, Query, SelectItem};

#[test]
fn parse_star_with_embed() {
    assert_eq!(
        SelectItem::parse("*, communities(name)").unwrap(),
        vec![
            SelectItem::All,
            SelectItem::Embed {
                relation: "communities".to_string(),
                items: vec![SelectItem::Column("name".to_string())],
            },
        ],
    );
}

#[test]
fn parse_nested_embed() {
    assert_eq!(
        SelectItem::parse("id,posts(title,communities(*))").unwrap(),
        vec![
            SelectItem::Column("id".to_string()),
            SelectItem::Embed {
                relation: "posts".to_string(),
                items: vec![
                    SelectItem::Column("title".to_string()),
                    SelectItem::Embed {
                        relation: "communities".to_string(),
                        items: vec![SelectItem::All],
                    },
                ],
            },
        ],
    );
}

#[test]
fn parse_malformed() {
    for input in ["", "*,", "communities(name", "name)", "a,,b", "()"] {
        assert!(SelectItem::parse(input).is_err(), "{input:?} should not parse");
    }
}

#[test]
fn builder_accumulates() {
    let query = Query::new("posts")
        .select("*, communities( name )")
        .eq("community_id", 5)
        .order("created_at", Direction::Descending)
        .limit(10);
    assert_eq!(query.table(), "posts");
    assert_eq!(query.columns(), "*,communities(name)");
    assert_eq!(query.filters()[0].column, "community_id");
    assert_eq!(query.filters()[0].value, json!(5));
    assert_eq!(query.filters()[0].operand(), "5");
    assert_eq!(query.ordering()[0].to_param(), "created_at.desc");
    assert_eq!(query.row_limit(), Some(10));
}

#[test]
fn string_operand_is_unquoted() {
    let query = Query::new("communities").eq("name", "Foo");
    assert_eq!(query.filters()[0].operand(), "Foo");
}
