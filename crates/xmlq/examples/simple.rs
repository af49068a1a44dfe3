//! Minimal end-to-end walkthrough: parse a document and chain queries.
//!
//! Run with: cargo run -p xmlq --example simple

use xmlq::{Context, Result, SimpleNode, XmlNode};

fn main() -> Result<()> {
    let q: Context<SimpleNode> = Context::parse_str(
        r#"<catalog>
             <section name="fruit">
               <item id="1">Apple</item>
               <item id="2">Orange</item>
             </section>
             <section name="veg">
               <item id="3">Carrot</item>
             </section>
           </catalog>"#,
    )?;

    let items = q.find("section > item")?;
    println!("{} items total", items.len());

    let fruit = q.find(r#"section[name="fruit"] item"#)?;
    for node in &fruit {
        println!(
            "fruit item {}: {}",
            node.attribute("id").unwrap_or_default(),
            node.text()
        );
    }

    let after_apple = items.filter(r#"item[id="1"]"#)?.next(None)?;
    println!("after Apple comes {}", after_apple.text());

    println!("first item serialized: {}", items.first().xml());
    Ok(())
}
