//! Symbol tables populated by the declaration collector.
//!
//! Ordered collections of declared entities, keyed by flattened name.
//! Insertion order is the contract: it drives emission order, so the
//! containers are Vec-backed with by-name lookup returning the first
//! match. Tables are owned state threaded through collector, resolver,
//! binder and emitter, with an explicit `clear` between independent runs.

use log::debug;

/// Record types stored in a [`Container`] expose their lookup key.
pub trait NamedRecord {
    fn name(&self) -> &str;
}

/// An insertion-ordered collection with by-name lookup.
#[derive(Debug)]
pub struct Container<T> {
    items: Vec<T>,
}

impl<T> Default for Container<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: NamedRecord> Container<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Appends a record. A duplicate non-empty name is kept (order matters
    /// for emission) but lookups will keep resolving to the first record.
    pub fn push(&mut self, item: T) {
        if !item.name().is_empty() && self.contains(item.name()) {
            debug!("duplicate symbol '{}'; lookups keep the first", item.name());
        }
        self.items.push(item);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.items.iter().any(|i| i.name() == name)
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.items.iter().find(|i| i.name() == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut T> {
        self.items.iter_mut().find(|i| i.name() == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<'a, T> IntoIterator for &'a Container<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// One dispatchable method of an interface, with pre-rendered types.
#[derive(Debug, Clone)]
pub struct Method {
    pub name: String,
    pub return_type: String,
    /// `type name` pairs, already rendered.
    pub args: Vec<String>,
}

/// A COM-style interface, translated to an explicit v-table struct.
#[derive(Debug)]
pub struct Interface {
    pub name: String,
    pub source_location: String,
    pub description: Option<String>,
    pub methods: Vec<Method>,
    /// Flattened, duplicate-free, order-preserving transitive base chain.
    /// Holds names only; the records live in the interface table.
    pub ancestors: Vec<String>,
    /// The four identifier construction tokens, once bound.
    pub iid: Option<[String; 4]>,
}

impl Interface {
    pub fn new(name: String, source_location: String, description: Option<String>) -> Self {
        Self {
            name,
            source_location,
            description,
            methods: Vec::new(),
            ancestors: Vec::new(),
            iid: None,
        }
    }

    pub fn add_method(&mut self, name: String, return_type: String, args: Vec<String>) {
        self.methods.push(Method {
            name,
            return_type,
            args,
        });
    }

    pub fn set_iid(&mut self, t1: String, t2: String, t3: String, t4: String) {
        self.iid = Some([t1, t2, t3, t4]);
    }
}

impl NamedRecord for Interface {
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug)]
pub struct Struct {
    pub name: String,
    pub source_location: String,
    /// Rendered field lines, `type name;` / `type name[bound];`.
    pub members: Vec<String>,
}

impl NamedRecord for Struct {
    fn name(&self) -> &str {
        &self.name
    }
}

/// A union nested in a struct, keyed by the owning struct's name so the
/// emitter can inline it.
#[derive(Debug)]
pub struct Union {
    pub parent: String,
    /// Rendered `type name` pairs.
    pub members: Vec<String>,
}

impl NamedRecord for Union {
    fn name(&self) -> &str {
        &self.parent
    }
}

#[derive(Debug)]
pub struct Enum {
    /// Empty for anonymous enums; they still contribute their enumerators.
    pub name: String,
    pub source_location: String,
    /// `(enumeratorName, valueExpression)`; the expression is empty when
    /// the value is implicit.
    pub enumerators: Vec<(String, String)>,
}

impl Enum {
    pub fn add_enumerator(&mut self, name: String, expression: String) {
        self.enumerators.push((name, expression));
    }
}

impl NamedRecord for Enum {
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug)]
pub struct Typedef {
    /// Alias text; carries the `[count]` suffix for array typedefs.
    pub name: String,
    pub underlying: String,
}

impl NamedRecord for Typedef {
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug)]
pub struct Variable {
    pub name: String,
    pub declared_type: String,
    pub value: String,
}

impl NamedRecord for Variable {
    fn name(&self) -> &str {
        &self.name
    }
}

/// All symbol tables of one run.
#[derive(Debug, Default)]
pub struct SymbolTables {
    pub interfaces: Container<Interface>,
    pub unions: Container<Union>,
    pub structs: Container<Struct>,
    pub enums: Container<Enum>,
    pub typedefs: Container<Typedef>,
    pub interface_typedefs: Container<Typedef>,
    pub variables: Container<Variable>,
}

impl SymbolTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets every table; used between independent runs.
    pub fn clear(&mut self) {
        self.interfaces.clear();
        self.unions.clear();
        self.structs.clear();
        self.enums.clear();
        self.typedefs.clear();
        self.interface_typedefs.clear();
        self.variables.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_preserves_insertion_order() {
        let mut enums = Container::new();
        enums.push(Enum {
            name: "B".into(),
            source_location: String::new(),
            enumerators: Vec::new(),
        });
        enums.push(Enum {
            name: "A".into(),
            source_location: String::new(),
            enumerators: Vec::new(),
        });
        let names: Vec<&str> = enums.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[test]
    fn lookup_returns_first_record() {
        let mut enums = Container::new();
        let mut first = Enum {
            name: "E".into(),
            source_location: String::new(),
            enumerators: Vec::new(),
        };
        first.add_enumerator("kOne".into(), String::new());
        enums.push(first);
        enums.push(Enum {
            name: "E".into(),
            source_location: String::new(),
            enumerators: Vec::new(),
        });
        assert_eq!(enums.len(), 2);
        assert_eq!(enums.get("E").unwrap().enumerators.len(), 1);
    }

    #[test]
    fn anonymous_records_coexist() {
        let mut enums = Container::new();
        enums.push(Enum {
            name: String::new(),
            source_location: String::new(),
            enumerators: Vec::new(),
        });
        enums.push(Enum {
            name: String::new(),
            source_location: String::new(),
            enumerators: Vec::new(),
        });
        assert_eq!(enums.len(), 2);
    }
}
