//! Primitive CMake statements.
//!
//! Rules and target emission are written in terms of these. Each statement
//! that can fail at configure time is followed by an explicit check so the
//! generated build stops on the first problem.

use super::CMakeFile;

/// Directory receiving single-header dependencies.
pub const INCLUDE_DIR: &str = "${CMAKE_BINARY_DIR}/.mkbuild/include";

/// Directory receiving single-file assets.
pub const DATA_DIR: &str = "${CMAKE_BINARY_DIR}/.mkbuild/data";

/// Directory receiving downloaded archives and their extracted content.
pub const DOWNLOAD_DIR: &str = "${CMAKE_BINARY_DIR}/.mkbuild/download";

/// Turn an arbitrary name into the upper-case tail of a CMake variable.
///
/// `curl/curl.h` becomes `CURL_CURL_H`.
pub fn variable_suffix(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Guard variable for a header check (`MK_HAVE_ARGH_H`).
pub fn header_guard(header: &str) -> String {
    format!("MK_HAVE_{}", variable_suffix(header))
}

/// Guard variable for a library check (`MK_HAVE_LIBCURL`).
///
/// Accepts either a bare library name or a path to a library file; the
/// directory, extension and `lib` prefix are ignored.
pub fn library_guard(library: &str) -> String {
    let file = library.rsplit('/').next().unwrap_or(library);
    let stem = file
        .strip_suffix(".lib")
        .or_else(|| file.strip_suffix(".a"))
        .unwrap_or(file);
    let stem = stem.strip_prefix("lib").unwrap_or(stem);
    format!("MK_HAVE_LIB{}", variable_suffix(stem))
}

impl CMakeFile {
    /// Abort configuration if the last `execute_process` failed.
    fn check_command_error(&mut self) {
        self.write_line("if(\"${FAILURE}\")");
        self.write_line("  message(FATAL_ERROR \"${FAILURE}\")");
        self.write_line("endif()");
    }

    /// Create `dirname` and all its parents.
    pub fn mkdir_all(&mut self, dirname: &str) {
        self.write_line(&format!("message(STATUS \"MkdirAll: {}\")", dirname));
        self.write_line("execute_process(COMMAND");
        self.write_line(&format!(
            "  ${{CMAKE_COMMAND}} -E make_directory \"{}\"",
            dirname
        ));
        self.write_line("  RESULT_VARIABLE FAILURE)");
        self.check_command_error();
        self.write_empty_line();
    }

    /// Download `url` into `filename`, verifying its SHA256.
    pub fn download(&mut self, filename: &str, sha256: &str, url: &str) {
        self.write_line(&format!("message(STATUS \"Download: {}\")", url));
        self.write_line(&format!("file(DOWNLOAD {}", url));
        self.write_line(&format!("  \"{}\"", filename));
        self.write_line(&format!("  EXPECTED_HASH SHA256={}", sha256));
        self.write_line("  TLS_VERIFY ON)");
        self.write_empty_line();
    }

    /// Extract the archive `filename` inside `destdir`.
    pub fn extract(&mut self, filename: &str, destdir: &str) {
        self.write_line(&format!("message(STATUS \"Extract: {}\")", filename));
        self.write_line("execute_process(COMMAND");
        self.write_line(&format!("  ${{CMAKE_COMMAND}} -E tar xf \"{}\"", filename));
        self.write_line(&format!("  WORKING_DIRECTORY \"{}\"", destdir));
        self.write_line("  RESULT_VARIABLE FAILURE)");
        self.check_command_error();
        self.write_empty_line();
    }

    /// Download an archive into [`DOWNLOAD_DIR`] and extract it there.
    pub fn download_and_extract(&mut self, archive_name: &str, sha256: &str, url: &str) {
        let filename = format!("{}/{}", DOWNLOAD_DIR, archive_name);
        self.mkdir_all(DOWNLOAD_DIR);
        self.download(&filename, sha256, url);
        self.extract(&filename, DOWNLOAD_DIR);
    }

    /// Set a CMake variable to a quoted value.
    pub fn set_variable(&mut self, name: &str, value: &str) {
        self.write_line(&format!("set({} \"{}\")", name, value));
    }

    /// Register a preprocessor definition for every target.
    pub fn add_definition(&mut self, definition: &str) {
        self.write_line(&format!(
            "list(APPEND CMAKE_REQUIRED_DEFINITIONS {})",
            definition
        ));
    }

    /// Register a header search directory for every target.
    pub fn add_include_dir(&mut self, path: &str) {
        self.write_line(&format!(
            "list(APPEND CMAKE_REQUIRED_INCLUDES \"{}\")",
            path
        ));
    }

    /// Register a library every target links with.
    pub fn add_library(&mut self, library: &str) {
        self.write_line(&format!(
            "list(APPEND CMAKE_REQUIRED_LIBRARIES \"{}\")",
            library
        ));
    }

    fn check_platform_result(&mut self, item: &str, variable: &str, mandatory: bool) {
        if mandatory {
            self.write_line(&format!("if(NOT (\"${{{}}}\"))", variable));
            self.write_line(&format!("  message(FATAL_ERROR \"cannot find: {}\")", item));
            self.write_line("endif()");
        }
    }

    /// Check whether `header` can be included, storing the result in
    /// `variable`. A mandatory check aborts configuration on failure.
    pub fn check_header_exists(&mut self, header: &str, variable: &str, mandatory: bool) {
        self.write_line(&format!(
            "CHECK_INCLUDE_FILE_CXX(\"{}\" {})",
            header, variable
        ));
        self.check_platform_result(header, variable, mandatory);
    }

    /// Check whether `library` exports `function`, storing the result in
    /// `variable`. A mandatory check aborts configuration on failure.
    pub fn check_library_exists(
        &mut self,
        library: &str,
        function: &str,
        variable: &str,
        mandatory: bool,
    ) {
        self.write_line(&format!(
            "CHECK_LIBRARY_EXISTS(\"{}\" \"{}\" \"\" {})",
            library, function, variable
        ));
        self.check_platform_result(library, variable, mandatory);
    }

    /// Mandatory header check with a derived guard variable.
    pub fn require_header_exists(&mut self, header: &str) {
        self.check_header_exists(header, &header_guard(header), true);
    }

    /// Mandatory library check with a derived guard variable.
    pub fn require_library_exists(&mut self, library: &str, function: &str) {
        self.check_library_exists(library, function, &library_guard(library), true);
    }

    /// Check whether `function` links, storing the result in `variable`.
    pub fn check_function_exists(&mut self, function: &str, variable: &str) {
        self.write_line(&format!(
            "CHECK_FUNCTION_EXISTS(\"{}\" {})",
            function, variable
        ));
    }

    /// Check whether `symbol` is declared by `header`, storing the result in
    /// `variable`.
    pub fn check_symbol_exists(&mut self, symbol: &str, header: &str, variable: &str) {
        self.write_line(&format!(
            "CHECK_SYMBOL_EXISTS(\"{}\" \"{}\" {})",
            symbol, header, variable
        ));
    }
}
