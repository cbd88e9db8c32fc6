//! Balanced conditional blocks.
//!
//! Every helper writes the opening marker, runs its branches one indent level
//! deeper and writes the closing marker itself, so callers never produce an
//! unbalanced `if()`/`endif()` pair. Conditions that fall through every known
//! platform end in a `FATAL_ERROR` branch instead of being skipped.

use anyhow::Result;

use super::emitter::INDENT;
use super::CMakeFile;

/// A configure-time condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// Targeting Windows (including MinGW)
    Windows,
    /// Targeting macOS / iOS
    Apple,
    /// Not targeting an Apple platform
    NotApple,
    /// Using the MinGW toolchain
    MinGw,
    /// 32-bit pointers
    PointerWidth32,
    /// 64-bit pointers
    PointerWidth64,
    /// GCC or Clang
    GnuLikeCompiler,
    /// GCC only
    GnuCompiler,
    /// Clang (including AppleClang)
    ClangCompiler,
    /// Microsoft Visual C++
    MsvcCompiler,
    /// A CMake variable evaluates to true
    IsSet(String),
    /// A path exists on the configuring host
    PathExists(String),
}

impl Condition {
    /// The CMake expression tested by this condition.
    pub fn expression(&self) -> String {
        match self {
            Condition::Windows => "(\"${WIN32}\")".to_string(),
            Condition::Apple => "(\"${APPLE}\")".to_string(),
            Condition::NotApple => "(NOT \"${APPLE}\")".to_string(),
            Condition::MinGw => "(\"${MINGW}\")".to_string(),
            Condition::PointerWidth32 => "(\"${CMAKE_SIZEOF_VOID_P}\" EQUAL 4)".to_string(),
            Condition::PointerWidth64 => "(\"${CMAKE_SIZEOF_VOID_P}\" EQUAL 8)".to_string(),
            Condition::GnuLikeCompiler => "(\"${CMAKE_CXX_COMPILER_ID}\" STREQUAL \"GNU\") OR \
                 (\"${CMAKE_CXX_COMPILER_ID}\" MATCHES \"Clang\")"
                .to_string(),
            Condition::GnuCompiler => "(\"${CMAKE_CXX_COMPILER_ID}\" STREQUAL \"GNU\")".to_string(),
            Condition::ClangCompiler => {
                "(\"${CMAKE_CXX_COMPILER_ID}\" MATCHES \"Clang\")".to_string()
            }
            Condition::MsvcCompiler => {
                "(\"${CMAKE_CXX_COMPILER_ID}\" STREQUAL \"MSVC\")".to_string()
            }
            Condition::IsSet(variable) => format!("(\"${{{}}}\")", variable),
            Condition::PathExists(path) => format!("(EXISTS \"{}\")", path),
        }
    }
}

/// Placeholder for a conditional without an else branch.
pub const NO_ELSE: Option<fn(&mut CMakeFile) -> Result<()>> = None;

impl CMakeFile {
    /// Emit `if(<cond>) then [else() otherwise] endif()`.
    ///
    /// With `otherwise == None` only the `then` branch is emitted.
    pub fn conditional<T, E>(
        &mut self,
        condition: &Condition,
        then: T,
        otherwise: Option<E>,
    ) -> Result<()>
    where
        T: FnOnce(&mut Self) -> Result<()>,
        E: FnOnce(&mut Self) -> Result<()>,
    {
        self.write_line(&format!("if({})", condition.expression()));
        let result = self.with_indent(INDENT, then).and_then(|()| match otherwise {
            Some(otherwise) => {
                self.write_line("else()");
                self.with_indent(INDENT, otherwise)
            }
            None => Ok(()),
        });
        self.write_line("endif()");
        result
    }

    /// Emit a Windows / non-Windows conditional.
    ///
    /// A missing `otherwise` still produces an (empty) `else()` branch.
    pub fn if_windows<T, E>(&mut self, then: T, otherwise: Option<E>) -> Result<()>
    where
        T: FnOnce(&mut Self) -> Result<()>,
        E: FnOnce(&mut Self) -> Result<()>,
    {
        self.if_else(&Condition::Windows, then, otherwise)
    }

    /// Emit an Apple / non-Apple conditional.
    ///
    /// A missing `otherwise` still produces an (empty) `else()` branch.
    pub fn if_apple<T, E>(&mut self, then: T, otherwise: Option<E>) -> Result<()>
    where
        T: FnOnce(&mut Self) -> Result<()>,
        E: FnOnce(&mut Self) -> Result<()>,
    {
        self.if_else(&Condition::Apple, then, otherwise)
    }

    fn if_else<T, E>(&mut self, condition: &Condition, then: T, otherwise: Option<E>) -> Result<()>
    where
        T: FnOnce(&mut Self) -> Result<()>,
        E: FnOnce(&mut Self) -> Result<()>,
    {
        self.write_line(&format!("if({})", condition.expression()));
        let result = self.with_indent(INDENT, then).and_then(|()| {
            self.write_line("else()");
            match otherwise {
                Some(otherwise) => self.with_indent(INDENT, otherwise),
                None => Ok(()),
            }
        });
        self.write_line("endif()");
        result
    }

    /// Emit 32-bit and 64-bit branches. Any other pointer width aborts
    /// configuration.
    pub fn if_pointer_width<A, B>(&mut self, body32: A, body64: B) -> Result<()>
    where
        A: FnOnce(&mut Self) -> Result<()>,
        B: FnOnce(&mut Self) -> Result<()>,
    {
        self.exhaustive(
            (Condition::PointerWidth32, body32),
            (Condition::PointerWidth64, body64),
            "Neither 32 nor 64 bit",
        )
    }

    /// Emit GCC/Clang and MSVC branches. Any other compiler aborts
    /// configuration.
    pub fn if_compiler_family<A, B>(&mut self, gnu_like: A, msvc: B) -> Result<()>
    where
        A: FnOnce(&mut Self) -> Result<()>,
        B: FnOnce(&mut Self) -> Result<()>,
    {
        self.exhaustive(
            (Condition::GnuLikeCompiler, gnu_like),
            (Condition::MsvcCompiler, msvc),
            "Compiler not supported: ${CMAKE_CXX_COMPILER_ID}",
        )
    }

    fn exhaustive<A, B>(
        &mut self,
        (first_condition, first): (Condition, A),
        (second_condition, second): (Condition, B),
        fatal: &str,
    ) -> Result<()>
    where
        A: FnOnce(&mut Self) -> Result<()>,
        B: FnOnce(&mut Self) -> Result<()>,
    {
        self.write_line(&format!("if({})", first_condition.expression()));
        let result = self.with_indent(INDENT, first).and_then(|()| {
            self.write_line(&format!("elseif({})", second_condition.expression()));
            self.with_indent(INDENT, second)
        });
        if result.is_ok() {
            self.write_line("else()");
            self.write_line(&format!("{}message(FATAL_ERROR \"{}\")", INDENT, fatal));
        }
        self.write_line("endif()");
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;

    fn count_blocks(text: &str) -> (usize, usize) {
        let opens = text
            .lines()
            .filter(|l| l.trim_start().starts_with("if("))
            .count();
        let closes = text.lines().filter(|l| l.trim() == "endif()").count();
        (opens, closes)
    }

    #[test]
    fn test_if_windows_layout() {
        let mut cmake = CMakeFile::new();
        cmake
            .if_windows(
                |cmake| {
                    cmake.write_line("set(A 1)");
                    Ok(())
                },
                Some(|cmake: &mut CMakeFile| {
                    cmake.write_line("set(A 2)");
                    Ok(())
                }),
            )
            .unwrap();

        assert_eq!(
            cmake.contents(),
            "if((\"${WIN32}\"))\n  set(A 1)\nelse()\n  set(A 2)\nendif()\n"
        );
    }

    #[test]
    fn test_if_apple_without_else_still_closes() {
        let mut cmake = CMakeFile::new();
        cmake
            .if_apple(
                |cmake| {
                    cmake.write_line("set(A 1)");
                    Ok(())
                },
                NO_ELSE,
            )
            .unwrap();

        assert_eq!(
            cmake.contents(),
            "if((\"${APPLE}\"))\n  set(A 1)\nelse()\nendif()\n"
        );
    }

    #[test]
    fn test_pointer_width_has_fatal_branch() {
        let mut cmake = CMakeFile::new();
        cmake
            .if_pointer_width(
                |cmake| {
                    cmake.set_variable("ARCH", "x86");
                    Ok(())
                },
                |cmake| {
                    cmake.set_variable("ARCH", "x64");
                    Ok(())
                },
            )
            .unwrap();

        let text = cmake.contents();
        assert!(text.contains("elseif((\"${CMAKE_SIZEOF_VOID_P}\" EQUAL 8))"));
        assert!(text.contains("  message(FATAL_ERROR \"Neither 32 nor 64 bit\")"));
        assert_eq!(count_blocks(text), (1, 1));
    }

    #[test]
    fn test_nested_conditionals_balance() {
        let mut cmake = CMakeFile::new();
        cmake
            .if_windows(
                |cmake| {
                    cmake.if_pointer_width(
                        |cmake| {
                            cmake.conditional(
                                &Condition::MinGw,
                                |cmake| {
                                    cmake.write_line("x()");
                                    Ok(())
                                },
                                NO_ELSE,
                            )
                        },
                        |_| Ok(()),
                    )
                },
                NO_ELSE,
            )
            .unwrap();

        let text = cmake.contents();
        assert_eq!(count_blocks(text), (3, 3));
        assert!(text.contains("\n      x()\n"));
    }

    #[test]
    fn test_failing_branch_still_closes() {
        let mut cmake = CMakeFile::new();
        let result = cmake.if_windows(|_| bail!("boom"), NO_ELSE);

        assert!(result.is_err());
        assert_eq!(cmake.indent(), "");
        let (opens, closes) = count_blocks(cmake.contents());
        assert_eq!(opens, closes);
    }

    #[test]
    fn test_condition_expressions() {
        assert_eq!(
            Condition::IsSet("HAVE_X".into()).expression(),
            "(\"${HAVE_X}\")"
        );
        assert_eq!(
            Condition::PathExists("/usr/local/opt/openssl".into()).expression(),
            "(EXISTS \"/usr/local/opt/openssl\")"
        );
    }
}
