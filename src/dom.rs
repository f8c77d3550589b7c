use std::collections::{HashMap, HashSet};

use crate::selector::{
    SelectorAttrCondition, SelectorCombinator, SelectorPart, SelectorPseudoClass, SelectorStep,
    parse_selector_groups,
};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(pub(crate) usize);

#[derive(Debug, Clone)]
pub(crate) enum NodeType {
    Document,
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) node_type: NodeType,
}

#[derive(Debug, Clone)]
pub(crate) struct Element {
    pub(crate) tag_name: String,
    pub(crate) attrs: HashMap<String, String>,
    // Live form-control value; the `value` attribute only seeds it.
    pub(crate) value: String,
}

#[derive(Debug, Clone)]
pub(crate) struct Dom {
    pub(crate) nodes: Vec<Node>,
    pub(crate) root: NodeId,
    id_index: HashMap<String, NodeId>,
}

impl Dom {
    pub(crate) fn new() -> Self {
        let root = Node {
            parent: None,
            children: Vec::new(),
            node_type: NodeType::Document,
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
            id_index: HashMap::new(),
        }
    }

    fn create_node(&mut self, parent: Option<NodeId>, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent,
            children: Vec::new(),
            node_type,
        });
        if let Some(parent_id) = parent {
            self.nodes[parent_id.0].children.push(id);
        }
        id
    }

    pub(crate) fn create_element(
        &mut self,
        parent: NodeId,
        tag_name: String,
        attrs: HashMap<String, String>,
    ) -> NodeId {
        let value = attrs.get("value").cloned().unwrap_or_default();
        let element = Element {
            tag_name,
            attrs,
            value,
        };
        let id = self.create_node(Some(parent), NodeType::Element(element));
        if let Some(id_attr) = self
            .element(id)
            .and_then(|element| element.attrs.get("id").cloned())
        {
            self.id_index.insert(id_attr, id);
        }
        id
    }

    /// Builds `<tag class="...">` under `parent`, the shape every component
    /// uses when it injects markup.
    pub(crate) fn create_element_with_class(
        &mut self,
        parent: NodeId,
        tag_name: &str,
        class_name: &str,
    ) -> NodeId {
        let mut attrs = HashMap::new();
        if !class_name.is_empty() {
            attrs.insert("class".to_string(), class_name.to_string());
        }
        self.create_element(parent, tag_name.to_string(), attrs)
    }

    pub(crate) fn create_text(&mut self, parent: NodeId, text: String) -> NodeId {
        self.create_node(Some(parent), NodeType::Text(text))
    }

    pub(crate) fn element(&self, node_id: NodeId) -> Option<&Element> {
        match &self.nodes.get(node_id.0)?.node_type {
            NodeType::Element(element) => Some(element),
            _ => None,
        }
    }

    pub(crate) fn element_mut(&mut self, node_id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes.get_mut(node_id.0)?.node_type {
            NodeType::Element(element) => Some(element),
            _ => None,
        }
    }

    pub(crate) fn tag_name(&self, node_id: NodeId) -> Option<&str> {
        self.element(node_id).map(|e| e.tag_name.as_str())
    }

    pub(crate) fn parent(&self, node_id: NodeId) -> Option<NodeId> {
        self.nodes.get(node_id.0).and_then(|node| node.parent)
    }

    pub(crate) fn children(&self, node_id: NodeId) -> &[NodeId] {
        self.nodes
            .get(node_id.0)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    pub(crate) fn is_descendant_of(&self, node_id: NodeId, ancestor: NodeId) -> bool {
        let mut cursor = self.parent(node_id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Inclusive containment, matching `Node.contains`.
    pub(crate) fn contains(&self, ancestor: NodeId, node_id: NodeId) -> bool {
        ancestor == node_id || self.is_descendant_of(node_id, ancestor)
    }

    pub(crate) fn by_id(&self, id: &str) -> Option<NodeId> {
        self.id_index.get(id).copied()
    }

    pub(crate) fn body(&self) -> NodeId {
        self.all_element_nodes()
            .into_iter()
            .find(|node| self.tag_name(*node) == Some("body"))
            .unwrap_or(self.root)
    }

    pub(crate) fn text_content(&self, node_id: NodeId) -> String {
        match &self.nodes[node_id.0].node_type {
            NodeType::Document | NodeType::Element(_) => {
                let mut out = String::new();
                for child in &self.nodes[node_id.0].children {
                    out.push_str(&self.text_content(*child));
                }
                out
            }
            NodeType::Text(text) => text.clone(),
        }
    }

    pub(crate) fn value(&self, node_id: NodeId) -> Result<String> {
        let element = self
            .element(node_id)
            .ok_or_else(|| Error::Dom("value target is not an element".into()))?;
        Ok(element.value.clone())
    }

    pub(crate) fn set_value(&mut self, node_id: NodeId, value: &str) -> Result<()> {
        let element = self
            .element_mut(node_id)
            .ok_or_else(|| Error::Dom("value target is not an element".into()))?;
        element.value = value.to_string();
        Ok(())
    }

    pub(crate) fn initialize_form_control_values(&mut self) {
        for node in self.all_element_nodes() {
            if self.tag_name(node) == Some("textarea") {
                let text = self.text_content(node);
                if let Some(element) = self.element_mut(node) {
                    element.value = text;
                }
            }
        }
    }

    pub(crate) fn disabled(&self, node_id: NodeId) -> bool {
        self.element(node_id)
            .is_some_and(|e| e.attrs.contains_key("disabled"))
    }

    pub(crate) fn set_disabled(&mut self, node_id: NodeId, disabled: bool) -> Result<()> {
        if disabled {
            self.set_attr(node_id, "disabled", "true")
        } else {
            self.remove_attr(node_id, "disabled")
        }
    }

    pub(crate) fn required(&self, node_id: NodeId) -> bool {
        self.element(node_id)
            .is_some_and(|e| e.attrs.contains_key("required"))
    }

    pub(crate) fn attr(&self, node_id: NodeId, name: &str) -> Option<String> {
        self.element(node_id)
            .and_then(|e| e.attrs.get(name).cloned())
    }

    pub(crate) fn has_attr(&self, node_id: NodeId, name: &str) -> bool {
        self.element(node_id)
            .is_some_and(|e| e.attrs.contains_key(&name.to_ascii_lowercase()))
    }

    pub(crate) fn set_attr(&mut self, node_id: NodeId, name: &str, value: &str) -> Result<()> {
        let lowered = name.to_ascii_lowercase();
        let element = self
            .element_mut(node_id)
            .ok_or_else(|| Error::Dom("setAttribute target is not an element".into()))?;
        element.attrs.insert(lowered.clone(), value.to_string());
        if lowered == "value" {
            element.value = value.to_string();
        }
        if lowered == "id" {
            self.rebuild_id_index();
        }
        Ok(())
    }

    pub(crate) fn remove_attr(&mut self, node_id: NodeId, name: &str) -> Result<()> {
        let lowered = name.to_ascii_lowercase();
        let element = self
            .element_mut(node_id)
            .ok_or_else(|| Error::Dom("removeAttribute target is not an element".into()))?;
        element.attrs.remove(&lowered);
        if lowered == "id" {
            self.rebuild_id_index();
        }
        Ok(())
    }

    /// Detaches `node` from its parent. Detached subtrees stay in the arena so
    /// stale handles keep resolving, they are just no longer connected.
    pub(crate) fn remove_node(&mut self, node: NodeId) -> Result<()> {
        if node == self.root {
            return Err(Error::Dom("cannot remove document root".into()));
        }
        let Some(parent) = self.parent(node) else {
            return Ok(());
        };
        self.nodes[parent.0].children.retain(|id| *id != node);
        self.nodes[node.0].parent = None;
        self.rebuild_id_index();
        Ok(())
    }

    pub(crate) fn is_connected(&self, node_id: NodeId) -> bool {
        self.contains(self.root, node_id)
    }

    pub(crate) fn style_get(&self, node_id: NodeId, name: &str) -> Result<String> {
        let element = self
            .element(node_id)
            .ok_or_else(|| Error::Dom("style target is not an element".into()))?;
        let name = name.to_ascii_lowercase();
        let decls = parse_style_declarations(element.attrs.get("style").map(String::as_str));
        Ok(decls
            .iter()
            .find(|(prop, _)| prop == &name)
            .map(|(_, value)| value.clone())
            .unwrap_or_default())
    }

    pub(crate) fn style_set(&mut self, node_id: NodeId, name: &str, value: &str) -> Result<()> {
        let name = name.to_ascii_lowercase();
        let element = self
            .element_mut(node_id)
            .ok_or_else(|| Error::Dom("style target is not an element".into()))?;

        let mut decls = parse_style_declarations(element.attrs.get("style").map(String::as_str));
        if let Some(pos) = decls.iter().position(|(prop, _)| prop == &name) {
            if value.is_empty() {
                decls.remove(pos);
            } else {
                decls[pos].1 = value.to_string();
            }
        } else if !value.is_empty() {
            decls.push((name, value.to_string()));
        }

        if decls.is_empty() {
            element.attrs.remove("style");
        } else {
            element
                .attrs
                .insert("style".to_string(), serialize_style_declarations(&decls));
        }

        Ok(())
    }

    pub(crate) fn class_contains(&self, node_id: NodeId, class_name: &str) -> bool {
        self.element(node_id)
            .is_some_and(|element| has_class(element, class_name))
    }

    pub(crate) fn class_add(&mut self, node_id: NodeId, class_name: &str) -> Result<()> {
        let element = self
            .element_mut(node_id)
            .ok_or_else(|| Error::Dom("classList target is not an element".into()))?;
        let mut classes = class_tokens(element.attrs.get("class").map(String::as_str));
        if !classes.iter().any(|name| name == class_name) {
            classes.push(class_name.to_string());
        }
        set_class_attr(element, &classes);
        Ok(())
    }

    pub(crate) fn class_remove(&mut self, node_id: NodeId, class_name: &str) -> Result<()> {
        let element = self
            .element_mut(node_id)
            .ok_or_else(|| Error::Dom("classList target is not an element".into()))?;
        let mut classes = class_tokens(element.attrs.get("class").map(String::as_str));
        classes.retain(|name| name != class_name);
        set_class_attr(element, &classes);
        Ok(())
    }

    pub(crate) fn class_toggle(&mut self, node_id: NodeId, class_name: &str) -> Result<bool> {
        if self.class_contains(node_id, class_name) {
            self.class_remove(node_id, class_name)?;
            Ok(false)
        } else {
            self.class_add(node_id, class_name)?;
            Ok(true)
        }
    }

    pub(crate) fn query_selector(&self, selector: &str) -> Result<Option<NodeId>> {
        let all = self.query_selector_all(selector)?;
        Ok(all.into_iter().next())
    }

    pub(crate) fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        let groups = parse_selector_groups(selector)?;

        if groups.len() == 1 && groups[0].len() == 1 {
            if let Some(id) = groups[0][0].step.id_only() {
                return Ok(self.by_id(id).into_iter().collect());
            }
        }

        let mut ids = Vec::new();
        self.collect_elements_dfs(self.root, &mut ids);
        Ok(self.filter_matching(ids, &groups))
    }

    pub(crate) fn query_selector_from(
        &self,
        root: NodeId,
        selector: &str,
    ) -> Result<Option<NodeId>> {
        let all = self.query_selector_all_from(root, selector)?;
        Ok(all.into_iter().next())
    }

    pub(crate) fn query_selector_all_from(
        &self,
        root: NodeId,
        selector: &str,
    ) -> Result<Vec<NodeId>> {
        let groups = parse_selector_groups(selector)?;
        let mut ids = Vec::new();
        self.collect_elements_descendants_dfs(root, &mut ids);
        Ok(self.filter_matching(ids, &groups))
    }

    fn filter_matching(
        &self,
        candidates: Vec<NodeId>,
        groups: &[Vec<SelectorPart>],
    ) -> Vec<NodeId> {
        let mut seen = HashSet::new();
        let mut matched = Vec::new();
        for candidate in candidates {
            if groups
                .iter()
                .any(|steps| self.matches_selector_chain(candidate, steps))
                && seen.insert(candidate)
            {
                matched.push(candidate);
            }
        }
        matched
    }

    pub(crate) fn matches_selector(&self, node_id: NodeId, selector: &str) -> Result<bool> {
        if self.element(node_id).is_none() {
            return Ok(false);
        }
        let groups = parse_selector_groups(selector)?;
        Ok(groups
            .iter()
            .any(|steps| self.matches_selector_chain(node_id, steps)))
    }

    pub(crate) fn closest(&self, node_id: NodeId, selector: &str) -> Result<Option<NodeId>> {
        let groups = parse_selector_groups(selector)?;
        let mut cursor = Some(node_id);
        while let Some(current) = cursor {
            if groups
                .iter()
                .any(|steps| self.matches_selector_chain(current, steps))
            {
                return Ok(Some(current));
            }
            cursor = self.parent(current);
        }
        Ok(None)
    }

    pub(crate) fn rebuild_id_index(&mut self) {
        let mut next = HashMap::new();
        let mut stack = vec![self.root];
        while let Some(node) = stack.pop() {
            if let NodeType::Element(element) = &self.nodes[node.0].node_type {
                if let Some(id) = element.attrs.get("id") {
                    if !id.is_empty() {
                        next.entry(id.clone()).or_insert(node);
                    }
                }
            }
            for child in self.nodes[node.0].children.iter().rev() {
                stack.push(*child);
            }
        }
        self.id_index = next;
    }

    fn collect_elements_dfs(&self, node_id: NodeId, out: &mut Vec<NodeId>) {
        if matches!(self.nodes[node_id.0].node_type, NodeType::Element(_)) {
            out.push(node_id);
        }
        for child in &self.nodes[node_id.0].children {
            self.collect_elements_dfs(*child, out);
        }
    }

    fn collect_elements_descendants_dfs(&self, node_id: NodeId, out: &mut Vec<NodeId>) {
        for child in &self.nodes[node_id.0].children {
            self.collect_elements_dfs(*child, out);
        }
    }

    pub(crate) fn all_element_nodes(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_elements_dfs(self.root, &mut out);
        out
    }

    fn matches_selector_chain(&self, node_id: NodeId, steps: &[SelectorPart]) -> bool {
        let Some((last, rest)) = steps.split_last() else {
            return false;
        };
        if !self.matches_step(node_id, &last.step) {
            return false;
        }
        if rest.is_empty() {
            return true;
        }

        match last.combinator.unwrap_or(SelectorCombinator::Descendant) {
            SelectorCombinator::Child => self
                .parent(node_id)
                .is_some_and(|parent| self.matches_selector_chain(parent, rest)),
            SelectorCombinator::Descendant => {
                // Any ancestor may anchor the rest of the chain, so keep walking
                // after a partial match fails further up.
                let mut cursor = self.parent(node_id);
                while let Some(ancestor) = cursor {
                    if self.matches_selector_chain(ancestor, rest) {
                        return true;
                    }
                    cursor = self.parent(ancestor);
                }
                false
            }
        }
    }

    fn matches_step(&self, node_id: NodeId, step: &SelectorStep) -> bool {
        let Some(element) = self.element(node_id) else {
            return false;
        };

        if let Some(tag) = &step.tag {
            if !element.tag_name.eq_ignore_ascii_case(tag) {
                return false;
            }
        }

        if let Some(id) = &step.id {
            if element.attrs.get("id") != Some(id) {
                return false;
            }
        }

        if step
            .classes
            .iter()
            .any(|class_name| !has_class(element, class_name))
        {
            return false;
        }

        for cond in &step.attrs {
            let matched = match cond {
                SelectorAttrCondition::Exists { key } => element.attrs.contains_key(key),
                SelectorAttrCondition::Eq { key, value } => element.attrs.get(key) == Some(value),
                SelectorAttrCondition::StartsWith { key, value } => element
                    .attrs
                    .get(key)
                    .is_some_and(|actual| !value.is_empty() && actual.starts_with(value.as_str())),
                SelectorAttrCondition::EndsWith { key, value } => element
                    .attrs
                    .get(key)
                    .is_some_and(|actual| !value.is_empty() && actual.ends_with(value.as_str())),
                SelectorAttrCondition::Contains { key, value } => element
                    .attrs
                    .get(key)
                    .is_some_and(|actual| !value.is_empty() && actual.contains(value.as_str())),
            };
            if !matched {
                return false;
            }
        }

        for pseudo in &step.pseudo_classes {
            let matched = match pseudo {
                SelectorPseudoClass::Disabled => element.attrs.contains_key("disabled"),
                SelectorPseudoClass::Enabled => !element.attrs.contains_key("disabled"),
                SelectorPseudoClass::Required => element.attrs.contains_key("required"),
                SelectorPseudoClass::FirstChild => self.is_first_element_child(node_id),
                SelectorPseudoClass::LastChild => self.is_last_element_child(node_id),
                SelectorPseudoClass::Not(groups) => !groups
                    .iter()
                    .any(|steps| self.matches_selector_chain(node_id, steps)),
            };
            if !matched {
                return false;
            }
        }

        true
    }

    fn element_siblings(&self, node_id: NodeId) -> Vec<NodeId> {
        let Some(parent) = self.parent(node_id) else {
            return vec![node_id];
        };
        self.children(parent)
            .iter()
            .copied()
            .filter(|child| self.element(*child).is_some())
            .collect()
    }

    fn is_first_element_child(&self, node_id: NodeId) -> bool {
        self.element_siblings(node_id).first() == Some(&node_id)
    }

    fn is_last_element_child(&self, node_id: NodeId) -> bool {
        self.element_siblings(node_id).last() == Some(&node_id)
    }

    pub(crate) fn dump_node(&self, node_id: NodeId) -> String {
        match &self.nodes[node_id.0].node_type {
            NodeType::Document => {
                let mut out = String::new();
                for child in &self.nodes[node_id.0].children {
                    out.push_str(&self.dump_node(*child));
                }
                out
            }
            NodeType::Text(text) => text.clone(),
            NodeType::Element(element) => {
                let mut out = String::new();
                out.push('<');
                out.push_str(&element.tag_name);
                let mut attrs = element.attrs.iter().collect::<Vec<_>>();
                attrs.sort();
                for (k, v) in attrs {
                    out.push(' ');
                    out.push_str(k);
                    out.push_str("=\"");
                    out.push_str(v);
                    out.push('"');
                }
                out.push('>');
                for child in &self.nodes[node_id.0].children {
                    out.push_str(&self.dump_node(*child));
                }
                out.push_str("</");
                out.push_str(&element.tag_name);
                out.push('>');
                out
            }
        }
    }
}

fn has_class(element: &Element, class_name: &str) -> bool {
    element
        .attrs
        .get("class")
        .map(|classes| classes.split_whitespace().any(|c| c == class_name))
        .unwrap_or(false)
}

fn class_tokens(class_attr: Option<&str>) -> Vec<String> {
    class_attr
        .map(|value| {
            value
                .split_whitespace()
                .filter(|token| !token.is_empty())
                .map(ToOwned::to_owned)
                .collect::<Vec<_>>()
        })
        .unwrap_or_default()
}

fn set_class_attr(element: &mut Element, classes: &[String]) {
    if classes.is_empty() {
        element.attrs.remove("class");
    } else {
        element.attrs.insert("class".to_string(), classes.join(" "));
    }
}

fn parse_style_declarations(style_attr: Option<&str>) -> Vec<(String, String)> {
    let mut out = Vec::new();
    let Some(style_attr) = style_attr else {
        return out;
    };

    for decl in style_attr.split(';') {
        let decl = decl.trim();
        if decl.is_empty() {
            continue;
        }
        let Some((name, value)) = decl.split_once(':') else {
            continue;
        };
        let name = name.trim().to_ascii_lowercase();
        if name.is_empty() {
            continue;
        }
        let value = value.trim().to_string();
        if let Some(pos) = out.iter().position(|(existing, _)| existing == &name) {
            out[pos].1 = value;
        } else {
            out.push((name, value));
        }
    }

    out
}

fn serialize_style_declarations(decls: &[(String, String)]) -> String {
    let mut out = String::new();
    for (idx, (name, value)) in decls.iter().enumerate() {
        if idx > 0 {
            out.push(' ');
        }
        out.push_str(name);
        out.push_str(": ");
        out.push_str(value);
        out.push(';');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::parse_html;

    fn dom(html: &str) -> Result<Dom> {
        parse_html(html)
    }

    #[test]
    fn class_list_add_remove_toggle() -> Result<()> {
        let mut dom = dom("<div id='a' class='x  y'></div>")?;
        let node = dom.by_id("a").ok_or_else(|| Error::Dom("missing".into()))?;
        dom.class_add(node, "z")?;
        assert_eq!(dom.attr(node, "class").as_deref(), Some("x y z"));
        dom.class_remove(node, "x")?;
        assert!(!dom.class_contains(node, "x"));
        assert!(!dom.class_toggle(node, "y")?);
        assert!(dom.class_toggle(node, "y")?);
        assert_eq!(dom.attr(node, "class").as_deref(), Some("z y"));
        Ok(())
    }

    #[test]
    fn style_set_replaces_and_clears_declarations() -> Result<()> {
        let mut dom = dom("<div id='t' style='color: red; transform: none'></div>")?;
        let node = dom.by_id("t").ok_or_else(|| Error::Dom("missing".into()))?;
        dom.style_set(node, "transform", "translateX(-300px)")?;
        assert_eq!(dom.style_get(node, "transform")?, "translateX(-300px)");
        assert_eq!(
            dom.attr(node, "style").as_deref(),
            Some("color: red; transform: translateX(-300px);")
        );
        dom.style_set(node, "color", "")?;
        dom.style_set(node, "transform", "")?;
        assert_eq!(dom.attr(node, "style"), None);
        Ok(())
    }

    #[test]
    fn descendant_selector_backtracks_past_nearest_ancestor() -> Result<()> {
        let dom = dom(
            "<section class='outer'><div class='inner'><div><span id='s'></span></div></div></section>",
        )?;
        let found = dom.query_selector_all(".outer .inner span")?;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0], dom.by_id("s").ok_or_else(|| Error::Dom("s".into()))?);
        Ok(())
    }

    #[test]
    fn scoped_query_excludes_root_itself() -> Result<()> {
        let dom = dom("<div id='c' class='card'><p class='card'></p></div>")?;
        let root = dom.by_id("c").ok_or_else(|| Error::Dom("c".into()))?;
        assert_eq!(dom.query_selector_all_from(root, ".card")?.len(), 1);
        Ok(())
    }

    #[test]
    fn focusable_selector_with_not_filters_negative_tabindex() -> Result<()> {
        let dom = dom(
            "<div id='m'><button>a</button><span tabindex='0'>b</span><span tabindex='-1'>c</span><a href='#x'>d</a></div>",
        )?;
        let root = dom.by_id("m").ok_or_else(|| Error::Dom("m".into()))?;
        let found = dom.query_selector_all_from(
            root,
            "button, [href], input, select, textarea, [tabindex]:not([tabindex=\"-1\"])",
        )?;
        let tags = found
            .iter()
            .filter_map(|node| dom.tag_name(*node))
            .collect::<Vec<_>>();
        assert_eq!(tags, vec!["button", "span", "a"]);
        Ok(())
    }

    #[test]
    fn remove_node_disconnects_subtree_and_id_index() -> Result<()> {
        let mut dom = dom("<div id='p'><span id='c'>x</span></div>")?;
        let child = dom.by_id("c").ok_or_else(|| Error::Dom("c".into()))?;
        dom.remove_node(child)?;
        assert!(!dom.is_connected(child));
        assert_eq!(dom.by_id("c"), None);
        assert_eq!(dom.text_content(child), "x");
        Ok(())
    }
}
