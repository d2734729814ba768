//! Style lookup with ODF inheritance rules.
//!
//! ODF documents reference styles by name from `text:style-name`
//! attributes. Automatic styles (`P1`, `T3`, ...) are generated by the
//! office suite for direct formatting and point at the user-visible named
//! style through `style:parent-style-name`. Properties not set on a style are
//! inherited from its parent chain and finally from the family's default
//! style.

use std::collections::HashMap;

use crate::tree::XmlNode;

/// Maximum parent chain length followed during lookups.
///
/// Guards against malformed documents with cyclic parent references.
const MAX_INHERITANCE_DEPTH: usize = 32;

/// Property group inside a style definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertySet {
    /// `style:paragraph-properties` (margins, indents).
    Paragraph,
    /// `style:text-properties` (font weight, style, color).
    Text,
}

/// A single `style:style` or `style:default-style` definition.
#[derive(Debug, Clone, Default)]
pub struct StyleDef {
    /// Style name (`Heading_20_1`, `P3`).
    pub name: String,
    /// Style family (`paragraph`, `text`, `table`, ...).
    pub family: String,
    /// Parent style name.
    pub parent: Option<String>,
    /// Whether the style comes from `office:automatic-styles`.
    pub automatic: bool,
    /// List style attached to a paragraph style.
    pub list_style_name: Option<String>,
    /// Attributes of `style:paragraph-properties`.
    pub paragraph_properties: HashMap<String, String>,
    /// Attributes of `style:text-properties`.
    pub text_properties: HashMap<String, String>,
}

impl StyleDef {
    fn from_node(node: &XmlNode, automatic: bool) -> Self {
        let properties = |tag: &str| {
            node.child(tag)
                .map(|props| props.attrs.clone())
                .unwrap_or_default()
        };
        Self {
            name: node.attr("style:name").unwrap_or_default().to_owned(),
            family: node.attr("style:family").unwrap_or_default().to_owned(),
            parent: node.attr("style:parent-style-name").map(str::to_owned),
            automatic,
            list_style_name: node.attr("style:list-style-name").map(str::to_owned),
            paragraph_properties: properties("style:paragraph-properties"),
            text_properties: properties("style:text-properties"),
        }
    }

    fn properties(&self, set: PropertySet) -> &HashMap<String, String> {
        match set {
            PropertySet::Paragraph => &self.paragraph_properties,
            PropertySet::Text => &self.text_properties,
        }
    }
}

/// Marker kind of a list level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListKind {
    /// `text:list-level-style-bullet` (also used for image bullets).
    #[default]
    Bullet,
    /// `text:list-level-style-number`.
    Number,
}

/// One level of a `text:list-style`.
#[derive(Debug, Clone)]
pub struct ListLevel {
    /// 1-based level number.
    pub level: u32,
    /// Marker kind.
    pub kind: ListKind,
    /// Left margin of items on this level, as written in the document.
    pub margin_left: Option<String>,
}

/// A `text:list-style` definition.
#[derive(Debug, Clone, Default)]
pub struct ListStyle {
    /// Style name.
    pub name: String,
    /// Level definitions in document order.
    pub levels: Vec<ListLevel>,
}

impl ListStyle {
    fn from_node(node: &XmlNode) -> Self {
        let levels = node
            .children
            .iter()
            .filter_map(|child| {
                let kind = match child.tag.as_str() {
                    "text:list-level-style-number" => ListKind::Number,
                    "text:list-level-style-bullet" | "text:list-level-style-image" => {
                        ListKind::Bullet
                    }
                    _ => return None,
                };
                let level = child
                    .attr("text:level")
                    .and_then(|l| l.parse().ok())
                    .unwrap_or(1);
                let margin_left = child.child("style:list-level-properties").and_then(|props| {
                    props
                        .child("style:list-level-label-alignment")
                        .and_then(|align| align.attr("fo:margin-left"))
                        .or_else(|| props.attr("text:space-before"))
                        .map(str::to_owned)
                });
                Some(ListLevel {
                    level,
                    kind,
                    margin_left,
                })
            })
            .collect();
        Self {
            name: node.attr("style:name").unwrap_or_default().to_owned(),
            levels,
        }
    }

    /// Level definition by 1-based level number.
    #[must_use]
    pub fn level(&self, level: u32) -> Option<&ListLevel> {
        self.levels.iter().find(|l| l.level == level)
    }

    /// Marker kind of the outermost level (bullet when undefined).
    #[must_use]
    pub fn kind(&self) -> ListKind {
        self.level(1).map(|l| l.kind).unwrap_or_default()
    }
}

/// Index of all styles declared in a document.
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    /// family -> name -> definition
    styles: HashMap<String, HashMap<String, StyleDef>>,
    /// family -> default style
    defaults: HashMap<String, StyleDef>,
    list_styles: HashMap<String, ListStyle>,
}

impl StyleSheet {
    /// Build the style index from the document parts.
    ///
    /// Named styles come from `styles.xml` (`office:styles`); automatic styles
    /// from `content.xml`. Styles declared directly in `content.xml` are also
    /// indexed so single-part documents resolve.
    #[must_use]
    pub fn from_parts(content: &XmlNode, styles: Option<&XmlNode>) -> Self {
        let mut sheet = Self::default();
        if let Some(styles_root) = styles
            && let Some(named) = styles_root.child("office:styles")
        {
            sheet.index(named, false);
        }
        if let Some(named) = content.child("office:styles") {
            sheet.index(named, false);
        }
        if let Some(automatic) = content.child("office:automatic-styles") {
            sheet.index(automatic, true);
        }
        tracing::debug!(
            families = sheet.styles.len(),
            list_styles = sheet.list_styles.len(),
            "Indexed document styles"
        );
        sheet
    }

    fn index(&mut self, container: &XmlNode, automatic: bool) {
        for node in &container.children {
            match node.tag.as_str() {
                "style:style" => {
                    let def = StyleDef::from_node(node, automatic);
                    self.styles
                        .entry(def.family.clone())
                        .or_default()
                        .insert(def.name.clone(), def);
                }
                "style:default-style" => {
                    let def = StyleDef::from_node(node, automatic);
                    self.defaults.insert(def.family.clone(), def);
                }
                "text:list-style" => {
                    let list = ListStyle::from_node(node);
                    self.list_styles.insert(list.name.clone(), list);
                }
                _ => {}
            }
        }
    }

    /// Look up a style definition.
    #[must_use]
    pub fn get(&self, family: &str, name: &str) -> Option<&StyleDef> {
        self.styles.get(family).and_then(|by_name| by_name.get(name))
    }

    /// Resolve an automatic style to the named style it derives from.
    ///
    /// Named styles and unknown names resolve to themselves.
    ///
    /// # Examples
    ///
    /// ```
    /// use rv_odf::StyleSheet;
    ///
    /// let sheet = StyleSheet::default();
    /// assert_eq!(sheet.named_style("paragraph", "Standard"), "Standard");
    /// ```
    #[must_use]
    pub fn named_style<'a>(&'a self, family: &str, name: &'a str) -> &'a str {
        let mut current = name;
        for _ in 0..MAX_INHERITANCE_DEPTH {
            match self.get(family, current) {
                Some(def) if def.automatic => match def.parent.as_deref() {
                    Some(parent) => current = parent,
                    None => return current,
                },
                _ => return current,
            }
        }
        current
    }

    /// Resolve a property through the parent chain and the family default.
    #[must_use]
    pub fn property(
        &self,
        family: &str,
        name: &str,
        set: PropertySet,
        key: &str,
    ) -> Option<&str> {
        let mut current = Some(name);
        for _ in 0..MAX_INHERITANCE_DEPTH {
            let Some(def) = current.and_then(|n| self.get(family, n)) else {
                break;
            };
            if let Some(value) = def.properties(set).get(key) {
                return Some(value);
            }
            current = def.parent.as_deref();
        }
        self.defaults
            .get(family)
            .and_then(|def| def.properties(set).get(key))
            .map(String::as_str)
    }

    /// Resolve a text property (`fo:font-weight`, ...) for a span style.
    #[must_use]
    pub fn text_property(&self, name: &str, key: &str) -> Option<&str> {
        self.property("text", name, PropertySet::Text, key)
    }

    /// Resolve a paragraph property (`fo:margin-left`, ...) for a paragraph style.
    #[must_use]
    pub fn paragraph_property(&self, name: &str, key: &str) -> Option<&str> {
        self.property("paragraph", name, PropertySet::Paragraph, key)
    }

    /// List style attached to a paragraph style, following parents.
    #[must_use]
    pub fn paragraph_list_style(&self, name: &str) -> Option<&str> {
        let mut current = Some(name);
        for _ in 0..MAX_INHERITANCE_DEPTH {
            let def = current.and_then(|n| self.get("paragraph", n))?;
            if let Some(list) = def.list_style_name.as_deref() {
                return Some(list);
            }
            current = def.parent.as_deref();
        }
        None
    }

    /// Look up a list style by name.
    #[must_use]
    pub fn list_style(&self, name: &str) -> Option<&ListStyle> {
        self.list_styles.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::OdfXmlParser;

    const STYLES: &str = r#"<office:document-styles>
<office:styles>
<style:default-style style:family="paragraph"><style:text-properties fo:font-size="12pt"/></style:default-style>
<style:style style:name="Standard" style:family="paragraph"/>
<style:style style:name="Text_20_body" style:family="paragraph" style:parent-style-name="Standard"><style:paragraph-properties fo:margin-left="0cm"/></style:style>
<style:style style:name="List_20_Contents" style:family="paragraph" style:parent-style-name="Text_20_body" style:list-style-name="List_20_1"/>
<style:style style:name="Strong_20_Emphasis" style:family="text"><style:text-properties fo:font-weight="bold"/></style:style>
<text:list-style style:name="List_20_1"><text:list-level-style-bullet text:level="1" text:bullet-char="•"><style:list-level-properties text:list-level-position-and-space-mode="label-alignment"><style:list-level-label-alignment fo:margin-left="0.635cm"/></style:list-level-properties></text:list-level-style-bullet></text:list-style>
</office:styles>
</office:document-styles>"#;

    const CONTENT: &str = r#"<office:document-content>
<office:automatic-styles>
<style:style style:name="P1" style:family="paragraph" style:parent-style-name="Text_20_body"><style:paragraph-properties fo:margin-left="1.27cm"/></style:style>
<style:style style:name="P2" style:family="paragraph" style:parent-style-name="P1"/>
<style:style style:name="T1" style:family="text"><style:text-properties fo:font-weight="bold"/></style:style>
<style:style style:name="T2" style:family="text" style:parent-style-name="Strong_20_Emphasis"><style:text-properties fo:font-style="italic"/></style:style>
<style:style style:name="T3" style:family="text"><style:text-properties fo:font-weight="normal"/></style:style>
<style:style style:name="Loop" style:family="paragraph" style:parent-style-name="Loop"/>
<text:list-style style:name="L1"><text:list-level-style-number text:level="1"/><text:list-level-style-bullet text:level="2"><style:list-level-properties text:space-before="1cm"/></text:list-level-style-bullet></text:list-style>
</office:automatic-styles>
<office:body/>
</office:document-content>"#;

    fn sheet() -> StyleSheet {
        let parser = OdfXmlParser::new();
        let content = parser.parse(CONTENT.as_bytes()).unwrap();
        let styles = parser.parse(STYLES.as_bytes()).unwrap();
        StyleSheet::from_parts(&content, Some(&styles))
    }

    #[test]
    fn test_named_style_follows_automatic_parents() {
        let sheet = sheet();
        assert_eq!(sheet.named_style("paragraph", "P2"), "Text_20_body");
        assert_eq!(sheet.named_style("paragraph", "P1"), "Text_20_body");
        assert_eq!(sheet.named_style("paragraph", "Text_20_body"), "Text_20_body");
        assert_eq!(sheet.named_style("paragraph", "Missing"), "Missing");
    }

    #[test]
    fn test_named_style_stops_on_cycle() {
        let sheet = sheet();
        assert_eq!(sheet.named_style("paragraph", "Loop"), "Loop");
    }

    #[test]
    fn test_text_property_direct() {
        let sheet = sheet();
        assert_eq!(sheet.text_property("T1", "fo:font-weight"), Some("bold"));
        assert_eq!(sheet.text_property("T3", "fo:font-weight"), Some("normal"));
    }

    #[test]
    fn test_text_property_inherited_from_named_style() {
        let sheet = sheet();
        assert_eq!(sheet.text_property("T2", "fo:font-weight"), Some("bold"));
        assert_eq!(sheet.text_property("T2", "fo:font-style"), Some("italic"));
    }

    #[test]
    fn test_text_property_missing() {
        let sheet = sheet();
        assert_eq!(sheet.text_property("Unknown", "fo:font-weight"), None);
    }

    #[test]
    fn test_paragraph_property_nearest_wins() {
        let sheet = sheet();
        assert_eq!(
            sheet.paragraph_property("P2", "fo:margin-left"),
            Some("1.27cm")
        );
        assert_eq!(
            sheet.paragraph_property("Text_20_body", "fo:margin-left"),
            Some("0cm")
        );
        assert_eq!(sheet.paragraph_property("Standard", "fo:margin-left"), None);
    }

    #[test]
    fn test_property_falls_back_to_default_style() {
        let sheet = sheet();
        assert_eq!(
            sheet.property("paragraph", "Standard", PropertySet::Text, "fo:font-size"),
            Some("12pt")
        );
    }

    #[test]
    fn test_list_styles() {
        let sheet = sheet();
        let numbered = sheet.list_style("L1").unwrap();
        assert_eq!(numbered.kind(), ListKind::Number);
        assert_eq!(numbered.level(2).unwrap().kind, ListKind::Bullet);
        assert_eq!(numbered.level(2).unwrap().margin_left.as_deref(), Some("1cm"));

        let bullets = sheet.list_style("List_20_1").unwrap();
        assert_eq!(bullets.kind(), ListKind::Bullet);
        assert_eq!(
            bullets.level(1).unwrap().margin_left.as_deref(),
            Some("0.635cm")
        );
    }

    #[test]
    fn test_paragraph_list_style_inherited() {
        let sheet = sheet();
        assert_eq!(
            sheet.paragraph_list_style("List_20_Contents"),
            Some("List_20_1")
        );
        assert_eq!(sheet.paragraph_list_style("P1"), None);
    }
}
