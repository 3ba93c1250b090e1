mod as_value;
mod binding;
mod builder;
mod clause;
mod driver;
mod error;
mod expression;
mod join;
mod method;
mod operator;
mod order_by;
mod row;
mod util;
mod value;
mod writer;

pub use ::anyhow::Context;
pub use as_value::*;
pub use binding::*;
pub use builder::*;
pub use clause::*;
pub use driver::*;
pub use error::*;
pub use expression::*;
pub use join::*;
pub use method::*;
pub use operator::*;
pub use order_by::*;
pub use row::*;
pub use util::*;
pub use value::*;
pub use writer::*;

pub type Result<T, E = Error> = anyhow::Result<T, E>;
pub type Error = anyhow::Error;
