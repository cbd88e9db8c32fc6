//! Target, test and configuration check declarations.

use std::collections::BTreeMap;

use anyhow::Result;

use super::conditional::{Condition, NO_ELSE};
use super::CMakeFile;
use crate::core::manifest::{FunctionCheck, SymbolCheck};
use crate::core::target::{BuildInfo, LibraryBuildInfo, ScriptBuildInfo, TargetKind};

/// Install destination for a public header.
///
/// Headers under `include/` keep their relative directory below
/// `${CMAKE_INSTALL_INCLUDEDIR}`; anything else lands directly in it.
pub fn header_destination(header: &str) -> String {
    let relative_dir = header
        .strip_prefix("include/")
        .and_then(|rest| rest.rsplit_once('/'))
        .map(|(dir, _)| dir);
    match relative_dir {
        Some(dir) => format!("${{CMAKE_INSTALL_INCLUDEDIR}}/{}", dir),
        None => "${CMAKE_INSTALL_INCLUDEDIR}".to_string(),
    }
}

impl CMakeFile {
    fn write_list(&mut self, command: &str, items: impl IntoIterator<Item = impl AsRef<str>>) {
        self.write_line(&format!("{}(", command));
        for item in items {
            self.write_line(&format!("  {}", item.as_ref()));
        }
        self.write_line(")");
    }

    fn link_target(&mut self, name: &str, link: &[String]) {
        if !link.is_empty() {
            self.write_line(&format!(
                "target_link_libraries({} {})",
                name,
                link.join(" ")
            ));
        }
    }

    /// Declare a library.
    pub fn add_library_target(&mut self, name: &str, info: &LibraryBuildInfo) {
        self.write_section_comment(&format!("{}: {}", TargetKind::Library, name));
        self.write_list(
            "add_library",
            std::iter::once(name).chain(info.compile.iter().map(String::as_str)),
        );
        self.link_target(name, &info.link);
        if info.install {
            self.write_line(&format!(
                "install(TARGETS {} DESTINATION ${{CMAKE_INSTALL_LIBDIR}})",
                name
            ));
            let mut by_destination: BTreeMap<String, Vec<&str>> = BTreeMap::new();
            for header in &info.headers {
                by_destination
                    .entry(header_destination(header))
                    .or_default()
                    .push(header);
            }
            for (destination, headers) in by_destination {
                self.write_line(&format!(
                    "install(FILES {} DESTINATION {})",
                    headers.join(" "),
                    destination
                ));
            }
        }
    }

    /// Declare an executable.
    pub fn add_executable_target(&mut self, name: &str, info: &BuildInfo) {
        self.write_section_comment(&format!("{}: {}", TargetKind::Executable, name));
        self.write_list(
            "add_executable",
            std::iter::once(name).chain(info.compile.iter().map(String::as_str)),
        );
        self.link_target(name, &info.link);
        if info.install {
            self.write_line(&format!(
                "install(TARGETS {} DESTINATION ${{CMAKE_INSTALL_BINDIR}})",
                name
            ));
        }
    }

    /// Copy a script into the build tree, optionally installing it.
    pub fn add_script_target(&mut self, name: &str, info: &ScriptBuildInfo) {
        self.write_section_comment(&format!("{}: {}", TargetKind::Script, name));
        self.write_line(&format!(
            "configure_file(\"${{CMAKE_CURRENT_SOURCE_DIR}}/{0}\" \"${{CMAKE_CURRENT_BINARY_DIR}}/{0}\" COPYONLY)",
            name
        ));
        if info.install {
            self.write_line(&format!(
                "install(PROGRAMS {} DESTINATION ${{CMAKE_INSTALL_BINDIR}})",
                name
            ));
        }
    }

    /// Register a CTest test.
    pub fn add_test(&mut self, name: &str, command: &[String]) {
        self.write_section_comment(&format!("test: {}", name));
        self.write_line("add_test(");
        self.write_line(&format!("  NAME {} COMMAND", name));
        for arg in command {
            self.write_line(&format!("  {}", arg));
        }
        self.write_line(")");
    }

    /// Emit function and symbol checks. Each check that succeeds registers
    /// its define for every target.
    pub fn add_configuration_checks(
        &mut self,
        functions: &[FunctionCheck],
        symbols: &[SymbolCheck],
    ) -> Result<()> {
        if functions.is_empty() && symbols.is_empty() {
            return Ok(());
        }
        self.write_section_comment("configuration checks");
        for check in functions {
            self.check_function_exists(&check.name, &check.define);
            self.define_if_set(&check.define)?;
        }
        for check in symbols {
            self.check_symbol_exists(&check.name, &check.header, &check.define);
            self.define_if_set(&check.define)?;
        }
        Ok(())
    }

    fn define_if_set(&mut self, variable: &str) -> Result<()> {
        self.conditional(
            &Condition::IsSet(variable.to_string()),
            |cmake| {
                cmake.add_definition(&format!("-D{}", variable));
                Ok(())
            },
            NO_ELSE,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_executable_lists_sources() {
        let mut cmake = CMakeFile::new();
        cmake.add_executable_target("demo", &BuildInfo::new(["main.cc", "util.cc"]));

        assert_eq!(
            cmake.contents(),
            "\n#\n# executable: demo\n#\n\nadd_executable(\n  demo\n  main.cc\n  util.cc\n)\n"
        );
    }

    #[test]
    fn test_library_install_groups_headers() {
        let info = LibraryBuildInfo {
            compile: vec!["src/core.c".into()],
            link: vec!["m".into(), "pthread".into()],
            install: true,
            headers: vec![
                "include/mk/core.h".into(),
                "include/mk/util.h".into(),
                "include/top.h".into(),
            ],
        };
        let mut cmake = CMakeFile::new();
        cmake.add_library_target("mkcore", &info);

        let text = cmake.contents();
        assert!(text.contains("target_link_libraries(mkcore m pthread)\n"));
        assert!(text.contains("install(TARGETS mkcore DESTINATION ${CMAKE_INSTALL_LIBDIR})\n"));
        assert!(text.contains(
            "install(FILES include/mk/core.h include/mk/util.h DESTINATION ${CMAKE_INSTALL_INCLUDEDIR}/mk)\n"
        ));
        assert!(text.contains("install(FILES include/top.h DESTINATION ${CMAKE_INSTALL_INCLUDEDIR})\n"));
    }

    #[test]
    fn test_library_without_install_has_no_install_rules() {
        let info = LibraryBuildInfo {
            compile: vec!["a.c".into()],
            headers: vec!["include/a.h".into()],
            ..Default::default()
        };
        let mut cmake = CMakeFile::new();
        cmake.add_library_target("a", &info);
        assert!(!cmake.contents().contains("install("));
    }

    #[test]
    fn test_add_test_layout() {
        let mut cmake = CMakeFile::new();
        cmake.add_test("smoke", &["demo".to_string(), "--help".to_string()]);

        assert!(cmake
            .contents()
            .ends_with("add_test(\n  NAME smoke COMMAND\n  demo\n  --help\n)\n"));
    }

    #[test]
    fn test_configuration_checks() {
        let functions = vec![FunctionCheck {
            name: "strlcpy".into(),
            define: "HAVE_STRLCPY".into(),
        }];
        let mut cmake = CMakeFile::new();
        cmake.add_configuration_checks(&functions, &[]).unwrap();

        let text = cmake.contents();
        assert!(text.contains("CHECK_FUNCTION_EXISTS(\"strlcpy\" HAVE_STRLCPY)\n"));
        assert!(text.contains(
            "if((\"${HAVE_STRLCPY}\"))\n  list(APPEND CMAKE_REQUIRED_DEFINITIONS -DHAVE_STRLCPY)\nendif()\n"
        ));
    }

    #[test]
    fn test_no_checks_emits_nothing() {
        let mut cmake = CMakeFile::new();
        cmake.add_configuration_checks(&[], &[]).unwrap();
        assert!(cmake.contents().is_empty());
    }

    #[test]
    fn test_header_destination() {
        assert_eq!(header_destination("include/a/b/c.h"), "${CMAKE_INSTALL_INCLUDEDIR}/a/b");
        assert_eq!(header_destination("include/c.h"), "${CMAKE_INSTALL_INCLUDEDIR}");
        assert_eq!(header_destination("c.h"), "${CMAKE_INSTALL_INCLUDEDIR}");
    }
}
