#[cfg(feature = "serde")]
#[macro_use]
extern crate serde;

macro_rules! auto_derived {
    ( $( $item:item )+ ) => {
        $(
            #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
            #[derive(Debug, Clone, Eq, PartialEq)]
            $item
        )+
    };
}

macro_rules! auto_derived_copy {
    ( $( $item:item )+ ) => {
        $(
            #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
            #[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
            $item
        )+
    };
}

pub mod v0;

/// Normalise free-form user input into a menu token
pub fn normalise_input(input: &str) -> String {
    input.trim().to_lowercase()
}
