mod builder;
mod parse;
