//! Axis operations: children, parent(s), siblings and the until
//! variants.

use xmlq::{Context, SimpleNode, XmlNode};

fn ctx(xml: &str) -> Context<SimpleNode> {
    Context::parse_str(xml).unwrap()
}

fn all_xml(q: &Context<SimpleNode>) -> Vec<String> {
    q.iter().map(xmlq::serialize::subtree).collect()
}

const NESTED: &str = "<doc><container><items><number>1</number><number>2</number></items></container>\
                      <items><number>3</number></items>\
                      <items><wrapper><number>4</number></wrapper></items></doc>";

const SIBLINGS: &str =
    "<doc><items><number>1</number><number>2</number><string>foo</string><number>3</number></items></doc>";

#[test]
fn children_of_the_document_is_the_root_element() {
    let q = ctx("<doc><hello /></doc>");
    assert_eq!(all_xml(&q.children(None).unwrap()), ["<doc><hello/></doc>"]);
    assert_eq!(all_xml(&q.children(Some("doc")).unwrap()), ["<doc><hello/></doc>"]);
    assert_eq!(all_xml(&q.children(Some("*")).unwrap()), ["<doc><hello/></doc>"]);
    assert_eq!(all_xml(&q.children(Some("")).unwrap()), ["<doc><hello/></doc>"]);
    assert_eq!(q.children(Some("empty")).unwrap().len(), 0);
}

#[test]
fn children_filter_in_place() {
    let q = ctx(SIBLINGS);
    let items = q.find("items").unwrap();
    assert_eq!(items.children(None).unwrap().len(), 4);
    assert_eq!(items.children(Some("number")).unwrap().len(), 3);
    // The filter applies to the children themselves, not below them.
    assert_eq!(items.children(Some("items number")).unwrap().len(), 0);
}

#[test]
fn parent_maps_every_node_without_deduplication() {
    let q = ctx(NESTED);
    let numbers = q.find("number").unwrap();
    let parents = numbers.parent(None).unwrap();
    assert_eq!(
        all_xml(&parents),
        [
            "<items><number>1</number><number>2</number></items>",
            "<items><number>1</number><number>2</number></items>",
            "<items><number>3</number></items>",
            "<wrapper><number>4</number></wrapper>",
        ]
    );
    assert_eq!(numbers.parent(Some("items")).unwrap().len(), 3);
    assert_eq!(numbers.parent(Some("wrapper")).unwrap().len(), 1);
    assert_eq!(numbers.parent(Some("nomatch")).unwrap().len(), 0);
}

#[test]
fn root_elements_have_no_element_parent() {
    let q = ctx("<doc><hello /></doc>");
    assert_eq!(q.find("doc").unwrap().parent(None).unwrap().len(), 0);
}

#[test]
fn parents_walk_to_the_root_nearest_first() {
    let q = ctx(NESTED);
    let four = q.find("wrapper number").unwrap();
    let names: Vec<_> = four
        .parents(None)
        .unwrap()
        .iter()
        .map(|n| n.name().unwrap().local.to_string())
        .collect();
    assert_eq!(names, ["wrapper", "items", "doc"]);

    let all = q.find("number").unwrap().parents(None).unwrap();
    assert_eq!(all.len(), 11);
    assert_eq!(q.find("number").unwrap().parents(Some("items")).unwrap().len(), 4);
    assert_eq!(q.find("number").unwrap().parents(Some("nomatch")).unwrap().len(), 0);
}

#[test]
fn parents_until_stops_before_the_first_match() {
    let q = ctx(NESTED);
    let numbers = q.find("number").unwrap();
    assert_eq!(
        all_xml(&numbers.parents_until("items").unwrap()),
        ["<wrapper><number>4</number></wrapper>"]
    );
    // No match anywhere: the whole ancestor chain comes back.
    assert_eq!(numbers.parents_until("nomatch").unwrap().len(), 11);
}

#[test]
fn next_takes_the_adjacent_element_sibling() {
    let q = ctx(SIBLINGS);
    let numbers = q.find("number").unwrap();
    assert_eq!(
        all_xml(&numbers.next(None).unwrap()),
        ["<number>2</number>", "<string>foo</string>"]
    );
    assert_eq!(
        all_xml(&numbers.next(Some("string")).unwrap()),
        ["<string>foo</string>"]
    );
    assert_eq!(numbers.next(Some("foo")).unwrap().len(), 0);
}

#[test]
fn next_all_repeats_shared_siblings_per_input_node() {
    let q = ctx(SIBLINGS);
    let numbers = q.find("number").unwrap();
    assert_eq!(
        all_xml(&numbers.next_all(None).unwrap()),
        [
            "<number>2</number>",
            "<string>foo</string>",
            "<number>3</number>",
            "<string>foo</string>",
            "<number>3</number>",
        ]
    );
    assert_eq!(numbers.next_all(Some("string")).unwrap().len(), 2);
}

#[test]
fn next_until_excludes_the_stopping_sibling() {
    let q = ctx(
        r#"<doc><attrs><attr name="fruit"/><attr name="color"/><attr name="number"/></attrs></doc>"#,
    );
    let fruit = q.find(r#"attr[name="fruit"]"#).unwrap();
    assert_eq!(fruit.next_until(r#"attr[name="color"]"#).unwrap().len(), 0);
    assert_eq!(fruit.next_until(r#"attr[name="number"]"#).unwrap().len(), 1);
    // No stop hit: every following sibling is included.
    assert_eq!(fruit.next_until(r#"attr[name="fruit"]"#).unwrap().len(), 2);
}

#[test]
fn prev_walks_the_other_direction() {
    let q = ctx(SIBLINGS);
    let numbers = q.find("number").unwrap();
    assert_eq!(
        all_xml(&numbers.prev(None).unwrap()),
        ["<number>1</number>", "<string>foo</string>"]
    );
    assert_eq!(
        all_xml(&numbers.prev(Some("string")).unwrap()),
        ["<string>foo</string>"]
    );
}

#[test]
fn prev_all_is_nearest_first() {
    let q = ctx(SIBLINGS);
    let three = q.find("number").unwrap().last();
    assert_eq!(
        all_xml(&three.prev_all(None).unwrap()),
        [
            "<string>foo</string>",
            "<number>2</number>",
            "<number>1</number>",
        ]
    );
    assert_eq!(three.prev_all(Some("number")).unwrap().len(), 2);
}

#[test]
fn prev_until_stops_at_the_first_matching_sibling() {
    let q = ctx(SIBLINGS);
    let three = q.find("number").unwrap().last();
    assert_eq!(
        all_xml(&three.prev_until("number").unwrap()),
        ["<string>foo</string>"]
    );
    assert_eq!(three.prev_until("nomatch").unwrap().len(), 3);
}

#[test]
fn traversal_on_an_empty_context_stays_empty() {
    let empty: Context<SimpleNode> = Context::new();
    assert_eq!(empty.children(None).unwrap().len(), 0);
    assert_eq!(empty.parent(None).unwrap().len(), 0);
    assert_eq!(empty.parents(Some("empty")).unwrap().len(), 0);
    assert_eq!(empty.parents_until("empty").unwrap().len(), 0);
    assert_eq!(empty.next(None).unwrap().len(), 0);
    assert_eq!(empty.next_all(None).unwrap().len(), 0);
    assert_eq!(empty.next_until("empty").unwrap().len(), 0);
    assert_eq!(empty.prev(None).unwrap().len(), 0);
    assert_eq!(empty.prev_all(None).unwrap().len(), 0);
    assert_eq!(empty.prev_until("empty").unwrap().len(), 0);
}
