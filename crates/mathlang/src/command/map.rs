//! Map type
use super::*;
use crate::error::spellcheck;
use std::collections::HashMap;

/// Map from command names (without the backslash) to commands,
///     and from environment names to environments.
///
/// The map is created with the built-in commands and environments.
/// While parsing, new commands may be inserted; existing entries are replaced, never modified.
#[derive(Clone, Default)]
pub struct Map {
    commands: HashMap<String, BuiltIn>,
    environments: HashMap<String, Environment>,
}

impl Map {
    pub fn new(
        commands: HashMap<&str, BuiltIn>,
        environments: HashMap<&str, Environment>,
    ) -> Map {
        Map {
            commands: commands
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            environments: environments
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        }
    }

    #[inline]
    pub fn get_command(&self, name: &str) -> Option<&Command> {
        self.commands.get(name).map(BuiltIn::cmd)
    }

    pub fn get_built_in(&self, name: &str) -> Option<&BuiltIn> {
        self.commands.get(name)
    }

    pub fn get_environment(&self, name: &str) -> Option<&Environment> {
        self.environments.get(name)
    }

    /// Inserts a macro, replacing any command with the same name.
    pub fn insert_macro(&mut self, name: &str, m: texmacro::Macro) {
        self.insert(name, BuiltIn::new_macro(m));
    }

    pub fn insert(&mut self, name: &str, built_in: BuiltIn) {
        self.commands.insert(name.to_string(), built_in);
    }

    pub fn insert_environment(&mut self, name: &str, environment: Environment) {
        self.environments.insert(name.to_string(), environment);
    }

    /// Command names close to the given name, closest first.
    pub fn close_command_names(&self, name: &str) -> Vec<&str> {
        close_names(self.commands.keys(), name)
    }

    /// Environment names close to the given name, closest first.
    pub fn close_environment_names(&self, name: &str) -> Vec<&str> {
        close_names(self.environments.keys(), name)
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty() && self.environments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }
}

fn close_names<'a, I: Iterator<Item = &'a String>>(keys: I, name: &str) -> Vec<&'a str> {
    let max_distance = std::cmp::max(1, name.chars().count() / 3);
    let mut names = spellcheck::find_close_words(keys.map(String::as_str), name, max_distance);
    names.truncate(3);
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &mut Parser<'_>, _: &str) -> mxl::Result<()> {
        Ok(())
    }

    #[test]
    fn insert_replaces() {
        let mut map = Map::new(
            HashMap::from([("Tr", BuiltIn::new(noop))]),
            HashMap::new(),
        );
        assert!(matches!(map.get_command("Tr"), Some(Command::Primitive(_))));
        map.insert_macro("Tr", texmacro::Macro::new("\\mathop{\\rm Tr}"));
        assert!(matches!(map.get_command("Tr"), Some(Command::Macro(_))));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn close_names() {
        let map = Map::new(
            HashMap::from([
                ("tag", BuiltIn::new(noop)),
                ("notag", BuiltIn::new(noop)),
                ("xrightarrow", BuiltIn::new(noop)),
            ]),
            HashMap::from([("align", Environment::new(noop))]),
        );
        assert_eq!(map.close_command_names("tga"), Vec::<&str>::new());
        assert_eq!(map.close_command_names("xrigtarrow"), vec!["xrightarrow"]);
        assert_eq!(map.close_command_names("notg"), vec!["notag"]);
        assert_eq!(map.close_environment_names("alin"), vec!["align"]);
    }
}
