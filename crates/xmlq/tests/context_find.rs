//! find/search over documents, including namespace-qualified queries.

use rstest::rstest;
use xmlq::{Context, Error, SimpleNode, XmlNode};

fn ctx(xml: &str) -> Context<SimpleNode> {
    Context::parse_str(xml).unwrap()
}

fn all_xml(q: &Context<SimpleNode>) -> Vec<String> {
    q.iter().map(xmlq::serialize::subtree).collect()
}

#[test]
fn find_on_an_empty_context_is_empty_but_still_compiles() {
    let empty: Context<SimpleNode> = Context::new();
    assert_eq!(empty.find("hello").unwrap().len(), 0);
    assert!(matches!(
        empty.find(">> bad child"),
        Err(Error::UnexpectedToken(_))
    ));
}

#[rstest]
#[case("<doc><hello /></doc>", "hello", 1)]
#[case(
    "<doc><items><item>1</item><item>2</item><item>3</item></items></doc>",
    "item",
    3
)]
#[case(
    "<doc><pets><cat>Fluffy</cat><dog>Fido</dog></pets><pets><cat>Mr. Whiskers</cat></pets><cat>Scratchy</cat></doc>",
    "pets cat",
    2
)]
fn find_counts_matches_below_every_node(#[case] xml: &str, #[case] sel: &str, #[case] n: usize) {
    assert_eq!(ctx(xml).find(sel).unwrap().len(), n);
    // search is the same operation under its older name
    assert_eq!(ctx(xml).search(sel).unwrap().len(), n);
}

#[test]
fn attribute_selector_narrows_before_descending() {
    let q = ctx(
        r#"<doc><attrs><attr name="fruit"><value>Apple</value></attr><attr name="color"><value>Red</value></attr></attrs></doc>"#,
    );
    let result = q.find(r#"attr[name="color"] value"#).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result.text(), "Red");
}

#[test]
fn child_combinator_stops_at_the_first_level() {
    let q = ctx(r#"<doc><item value="Apple" /><list><item value="Orange" /><item value="Banana" /></list></doc>"#);
    let values = |c: &Context<SimpleNode>| {
        c.iter()
            .map(|n| n.attribute("value").unwrap())
            .collect::<Vec<_>>()
    };
    assert_eq!(values(&q.find("item").unwrap()), ["Apple", "Orange", "Banana"]);
    assert_eq!(values(&q.find("doc > item").unwrap()), ["Apple"]);
}

#[test]
fn sibling_combinator_takes_the_adjacent_element() {
    let q = ctx(
        r#"<doc><item value="Kiwi" /><item value="Orange" /><item value="Grape" /></doc>"#,
    );
    let orange = q.find(r#"item[value="Kiwi"] + item"#).unwrap();
    assert_eq!(orange.len(), 1);
    assert_eq!(orange.attr("value").as_deref(), Some("Orange"));
}

#[test]
fn universal_selector_walks_in_document_order() {
    let q = ctx("<doc><hello /></doc>");
    let names: Vec<_> = q
        .find("*")
        .unwrap()
        .iter()
        .map(|n| n.name().unwrap().local.to_string())
        .collect();
    assert_eq!(names, ["doc", "hello"]);

    let q = ctx("<doc><items><item>1</item><item>2</item><item>3</item></items></doc>");
    let described: Vec<_> = q
        .find("doc *")
        .unwrap()
        .iter()
        .map(|n| format!("{} ({})", n.name().unwrap().local, n.text()))
        .collect();
    assert_eq!(described, ["items (123)", "item (1)", "item (2)", "item (3)"]);
}

#[rstest]
#[case("hi")]
#[case("doc hi")]
#[case("doc > hi")]
#[case("> hi")]
#[case("doc + hi")]
#[case("+ hi")]
#[case("doc hello *")]
fn unmatched_selectors_yield_empty_sets(#[case] sel: &str) {
    assert_eq!(ctx("<doc><hello /></doc>").find(sel).unwrap().len(), 0);
}

#[test]
fn empty_selector_copies_the_node_set() {
    let q = ctx("<doc><hello /></doc>");
    let copy = q.find("").unwrap();
    assert_eq!(copy.len(), 1);
    assert_eq!(copy.get(0), q.get(0));
}

#[test]
fn registered_prefixes_match_by_uri() {
    let mut q = ctx(
        r#"<doc xmlns="http://example.com/A" xmlns:nsb="http://example.com/B"><item>A</item><nsb:item>B</nsb:item></doc>"#,
    );
    q.add_namespace("a", "http://example.com/A");
    q.add_namespace("b", "http://example.com/B");

    // An unprefixed name ignores namespaces entirely.
    assert_eq!(
        all_xml(&q.find("item").unwrap()),
        ["<item>A</item>", "<nsb:item>B</nsb:item>"]
    );
    assert_eq!(all_xml(&q.find("a:item").unwrap()), ["<item>A</item>"]);
    assert_eq!(all_xml(&q.find("b:item").unwrap()), ["<nsb:item>B</nsb:item>"]);
    assert_eq!(
        all_xml(&q.find("item").unwrap().not("a:item").unwrap()),
        ["<nsb:item>B</nsb:item>"]
    );
}

#[test]
fn unknown_prefix_is_an_error_even_with_no_matches_possible() {
    let mut q = ctx(r#"<doc xmlns="http://example.com/A"><item>A</item></doc>"#);
    q.add_namespace("a", "http://example.com/A");
    assert_eq!(
        q.find("c:item").unwrap_err(),
        Error::UnknownNamespacePrefix("c".into())
    );
}

#[test]
fn prefix_bound_to_the_empty_uri_matches_unqualified_elements() {
    let mut q = ctx(
        r#"<doc xmlns:n="http://example.com/N"><n:item>ns</n:item><item>plain</item></doc>"#,
    );
    q.add_namespace("plain", "");
    let found = q.find("plain:item").unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found.text(), "plain");
}

#[test]
fn find_chains_without_touching_the_source_context() {
    let q = ctx("<doc><a><b><c>deep</c></b></a></doc>");
    let b = q.find("a").unwrap().find("b").unwrap();
    assert_eq!(b.len(), 1);
    assert_eq!(b.find("c").unwrap().text(), "deep");
    assert_eq!(q.len(), 1);
}

#[test]
fn duplicate_matches_are_kept_per_input_node() {
    let q = ctx("<doc><a><x/></a><a><x/></a></doc>");
    // Both document-level "a x" paths plus re-finding below each a.
    let xs = q.find("a").unwrap().find("x").unwrap();
    assert_eq!(xs.len(), 2);
    let nested = q.find("doc").unwrap().find("a x").unwrap();
    assert_eq!(nested.len(), 2);
}
