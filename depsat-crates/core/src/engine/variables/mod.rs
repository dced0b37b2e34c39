mod literal;
mod propositional_variable;

pub use literal::Literal;
pub use literal::LiteralConversionError;
pub use propositional_variable::PropositionalVariable;
