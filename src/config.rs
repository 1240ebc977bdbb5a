//! Parser policies that are not fixed by the documentation format.

/// What to do with an unknown or malformed instruction inside a `@param` directive.
///
/// Instructions inside `@description` and `@return` directives are always strict,
/// because the renderers rely on those being fully resolved.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum UnknownInstructionPolicy {
    /// Log a warning and continue with the next instruction.
    #[default]
    Skip,
    /// Abort the parse.
    Fail,
}

/// When a `@param` without a `type(...)` instruction is rejected.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum UntypedParamPolicy {
    /// Accept it into the model, renderers fail with an unknown type error.
    #[default]
    FailAtRender,
    /// Reject it while building the model.
    FailAtParse,
}

/// Configuration of a [`RoxygenParser`](crate::parser::RoxygenParser).
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub struct ParserConfig {
    pub unknown_param_instructions: UnknownInstructionPolicy,
    pub untyped_params: UntypedParamPolicy,
}
