mod finite;
pub use finite::FiniteWord;

mod concat;
pub use concat::Concat;

mod kleene;
pub use kleene::{words_of_length, KleeneStar};
