//! Parsers des éléments LandXML
//!
//! Tous les parsers reçoivent le [`Namespace`] capturé une fois depuis
//! l'élément racine: les producteurs LandXML n'utilisent pas tous la même
//! version de schéma, donc pas le même URI.

pub mod header;
pub mod points;
pub mod records;
pub mod segment;

use roxmltree::Node;

/// Espace de noms des éléments du document, détecté à l'exécution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Namespace {
    uri: Option<String>,
}

impl Namespace {
    /// Capture l'espace de noms de l'élément racine
    pub fn from_root(root: Node) -> Self {
        Self {
            uri: root.tag_name().namespace().map(str::to_string),
        }
    }

    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    /// Vrai si `node` est l'élément `local` dans cet espace de noms
    pub fn is(&self, node: Node, local: &str) -> bool {
        node.is_element()
            && node.tag_name().name() == local
            && node.tag_name().namespace() == self.uri.as_deref()
    }

    /// Premier enfant direct `local`
    pub fn child<'a, 'input>(&self, node: Node<'a, 'input>, local: &str) -> Option<Node<'a, 'input>> {
        node.children().find(|c| self.is(*c, local))
    }
}

/// Parcours paresseux des enregistrements `Group/Record` sous la racine
/// (ex: `Parcels/Parcel`), tous groupes confondus, dans l'ordre du document
pub(crate) struct Records<'a, 'input> {
    namespace: &'a Namespace,
    groups: roxmltree::Children<'a, 'input>,
    current: Option<roxmltree::Children<'a, 'input>>,
    group_tag: &'static str,
    record_tag: &'static str,
}

impl<'a, 'input> Records<'a, 'input> {
    pub(crate) fn new(
        root: Node<'a, 'input>,
        namespace: &'a Namespace,
        group_tag: &'static str,
        record_tag: &'static str,
    ) -> Self {
        Self {
            namespace,
            groups: root.children(),
            current: None,
            group_tag,
            record_tag,
        }
    }
}

impl<'a, 'input> Iterator for Records<'a, 'input> {
    type Item = Node<'a, 'input>;

    fn next(&mut self) -> Option<Self::Item> {
        let ns = self.namespace;
        let (group_tag, record_tag) = (self.group_tag, self.record_tag);

        loop {
            if let Some(children) = self.current.as_mut() {
                if let Some(record) = children.find(|n| ns.is(*n, record_tag)) {
                    return Some(record);
                }
            }
            let group = self.groups.find(|n| ns.is(*n, group_tag))?;
            self.current = Some(group.children());
        }
    }
}

/// Valeur d'attribut, chaîne vide si absent
#[inline]
pub(crate) fn attr<'a>(node: Node<'a, '_>, name: &str) -> &'a str {
    node.attribute(name).unwrap_or("")
}

/// Texte d'un élément, `None` si vide ou blanc
#[inline]
pub(crate) fn text<'a>(node: Node<'a, '_>) -> Option<&'a str> {
    node.text().map(str::trim).filter(|t| !t.is_empty())
}
