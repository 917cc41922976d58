/*!
Mathlang unit testing library

This is a crate for writing unit tests for code that uses Mathlang.
It is used extensively in the Mathlang standard library,
    so the unit tests there are good examples of what this crate can do.

## Test types

### MathML tests

Run using [`run_mathml_test`].

These tests verify that a snippet of math produces specific MathML.
The comparison is done on the serialized content of the `math` element,
    so the expected output does not include the `math` element itself.
For example, the test
```
# use mathlang_testing::*;
# use mathlang::command;
# use std::collections::HashMap;
# fn built_ins() -> command::Map { command::Map::new(HashMap::new(), HashMap::new()) }
run_mathml_test("x^2", "<msup><mi>x</mi><mn>2</mn></msup>", &[TestOption::BuiltIns(built_ins)]);
```
passes.

### Failure tests

Run using [`run_failure_test`].

These tests verify that a snippet fails to parse with a specific [error kind](mathlang::error::Kind).

### Document tests

Run using [`run_document_test`].

These tests typeset several equations as one document,
    so that equation numbers and cross-references carry over from one equation to the next.

## The test suite macro

The preferred way to write a suite of unit tests is to use the [`test_suite`] macro.
*/

use mathlang::command;
use mathlang::config::Config;
use mathlang::document::{Document, Mode};
use mathlang::error::Kind;
use mathlang::node::Node;

/// Option passed to a test runner.
pub enum TestOption {
    /// The built-in commands and environments are the result of invoking the provided static function.
    ///
    /// Overrides previous `BuiltIns` options.
    BuiltIns(fn() -> command::Map),

    /// The document configuration is the result of invoking the provided static function.
    ///
    /// Overrides previous `Config` options.
    Config(fn() -> Config),

    /// Display mode of the equations. Defaults to [Mode::Display].
    Mode(Mode),
}

struct ResolvedOptions {
    built_ins: fn() -> command::Map,
    config: fn() -> Config,
    mode: Mode,
}

impl ResolvedOptions {
    fn new(options: &[TestOption]) -> Self {
        let mut resolved = Self {
            built_ins: command::Map::default,
            config: Config::default,
            mode: Mode::Display,
        };
        for option in options {
            match option {
                TestOption::BuiltIns(f) => resolved.built_ins = *f,
                TestOption::Config(f) => resolved.config = *f,
                TestOption::Mode(mode) => resolved.mode = *mode,
            }
        }
        resolved
    }

    fn document(&self) -> Document {
        Document::new((self.built_ins)(), (self.config)())
    }
}

fn serialize_content(math: &Node) -> String {
    math.children().iter().map(Node::to_string).collect()
}

/// Run a MathML test.
///
/// The test passes if the input parses and its content serializes to the expected string.
pub fn run_mathml_test(input: &str, expected: &str, options: &[TestOption]) {
    let options = ResolvedOptions::new(options);
    let mut document = options.document();
    let math = match document.parse(input, options.mode) {
        Ok(math) => math,
        Err(err) => {
            println!("{err}");
            panic!("MathML test failed: parsing did not succeed");
        }
    };
    similar_asserts::assert_eq!(serialize_content(&math), expected.to_string());
}

/// Run a failure test.
///
/// The test passes if parsing the input fails with an error of the given kind.
pub fn run_failure_test(input: &str, kind: Kind, options: &[TestOption]) {
    let options = ResolvedOptions::new(options);
    let mut document = options.document();
    match document.parse(input, options.mode) {
        Ok(math) => {
            println!("Parsing succeeded:");
            println!("{math}");
            panic!("Failure test did not pass: parsing successful");
        }
        Err(err) => {
            println!("{err}");
            assert_eq!(err.kind(), kind, "parsing failed with the wrong kind of error");
        }
    }
}

/// Run a document test.
///
/// All inputs are typeset as one document.
/// The test passes if every input parses and serializes to the corresponding expected string.
pub fn run_document_test(inputs: &[&str], expected: &[&str], options: &[TestOption]) {
    let options = ResolvedOptions::new(options);
    let mut document = options.document();
    let sources: Vec<(&str, Mode)> = inputs.iter().map(|input| (*input, options.mode)).collect();
    let results = document.typeset(&sources);
    assert_eq!(results.len(), expected.len(), "number of inputs and outputs differ");
    for (i, (result, expected)) in results.into_iter().zip(expected).enumerate() {
        match result {
            Ok(math) => similar_asserts::assert_eq!(serialize_content(&math), expected.to_string()),
            Err(err) => {
                println!("{err}");
                panic!("Document test failed: equation {i} did not parse");
            }
        }
    }
}

/// Macro to generate a suite of unit tests
///
/// The general use of this macros looks like this:
/// ```
/// # use mathlang_testing::*;
/// # use mathlang::command;
/// # use std::collections::HashMap;
/// # fn built_ins() -> command::Map { command::Map::new(HashMap::new(), HashMap::new()) }
/// test_suite![
///     options(TestOption::BuiltIns(built_ins)),
///     mathml_tests(
///         (case_1, "x", "<mi>x</mi>"),
///     ),
///     failure_tests(
///         (case_2, "x}", ExtraCloseBrace),
///     ),
///     document_tests(
///         (case_3, ["x", "y"], ["<mi>x</mi>", "<mi>y</mi>"]),
///     ),
/// ];
/// ```
///
/// The arguments to the macro are:
///
/// - `options(option_1, option_2, ..., option_n)`: options to pass to the test runner.
///     This is a list of values of type [TestOption].
///     The options can be omitted, in which case they default to `options(TestOption::BuiltIns(built_ins))`.
///     In this case `built_ins` is a static function in the current scope that returns the command map.
///
/// - `mathml_tests(cases...)`: each case is of the form (case name, input, expected MathML).
///     The data here is fed into the [run_mathml_test] test runner.
///
/// - `failure_tests(cases...)`: each case is of the form (case name, input, error kind).
///     The error kind is the name of a variant of [mathlang::error::Kind].
///     The data here is fed into the [run_failure_test] test runner.
///
/// - `document_tests(cases...)`: each case is of the form (case name, [inputs...], [expected...]).
///     The data here is fed into the [run_document_test] test runner.
///
/// Only one `options()` argument may be provided, and if provided it must be in the first position.
/// Zero or more of the other arguments may be provided, and in any order.
#[macro_export]
macro_rules! test_suite {
    ( options $options: tt, mathml_tests ( $( ($name: ident, $input: expr, $expected: expr $(,)? ) ),* $(,)? ) $(,)? ) => (
        $(
            #[test]
            fn $name() {
                let options = vec! $options;
                mathlang_testing::run_mathml_test($input, $expected, &options);
            }
        )*
    );
    ( options $options: tt, mathml_tests $test_body: tt $(,)? ) => (
        compile_error!("Invalid test cases for mathml_tests: must be a list of tuples (name, input, expected)");
    );
    ( options $options: tt, failure_tests ( $( ($name: ident, $input: expr, $kind: ident $(,)? ) ),* $(,)? ) $(,)? ) => (
        $(
            #[test]
            fn $name() {
                let options = vec! $options;
                mathlang_testing::run_failure_test($input, mathlang::error::Kind::$kind, &options);
            }
        )*
    );
    ( options $options: tt, failure_tests $test_body: tt $(,)? ) => (
        compile_error!("Invalid test cases for failure_tests: must be a list of tuples (name, input, kind)");
    );
    ( options $options: tt, document_tests ( $( ($name: ident, [ $( $input: expr ),* $(,)? ], [ $( $expected: expr ),* $(,)? ] $(,)? ) ),* $(,)? ) $(,)? ) => (
        $(
            #[test]
            fn $name() {
                let options = vec! $options;
                mathlang_testing::run_document_test(&[ $( $input ),* ], &[ $( $expected ),* ], &options);
            }
        )*
    );
    ( options $options: tt, $test_kind: ident $test_cases: tt $(,)? ) => (
        compile_error!("Invalid keyword: test_suite! only accepts the following keywords: `options`, `mathml_tests`, `failure_tests`, `document_tests`");
    );
    ( options $options: tt, $( $test_kind: ident $test_cases: tt ),+ $(,)? ) => (
        $(
            mathlang_testing::test_suite![options $options, $test_kind $test_cases,];
        )+
    );
    ( $( $test_kind: ident $test_cases: tt ),+ $(,)? ) => (
        mathlang_testing::test_suite![options (mathlang_testing::TestOption::BuiltIns(built_ins)), $( $test_kind $test_cases, )+ ];
    );
}
