pub mod config;
pub mod core;

/// Declares a serde record with public fields.
///
/// `Option` fields default to `None` when absent from the JSON and get a
/// borrowing getter of the same name.
#[macro_export]
macro_rules! serializable_record {
    ( @ $name:ident { } -> ($($fields:tt)*) ($($getters:tt)*) ) => (
        #[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
        pub struct $name {
            $($fields)*
        }
        impl $name {
            $($getters)*
        }
    );
    ( @ $name:ident { $(#[$attr:meta])* $param:ident : Option<$type:ty>, $($rest:tt)* } -> ($($fields:tt)*) ($($getters:tt)*) ) => (
        serializable_record!(@ $name { $($rest)* } -> (
            $($fields)*
            $(#[$attr])*
            #[serde(default)]
            pub $param : Option<$type>,
        ) (
            $($getters)*
            pub fn $param(&self) -> Option<&$type> {
                self.$param.as_ref()
            }
        ));
    );
    ( @ $name:ident { $(#[$attr:meta])* $param:ident : $type:ty, $($rest:tt)* } -> ($($fields:tt)*) ($($getters:tt)*) ) => (
        serializable_record!(@ $name { $($rest)* } -> (
            $($fields)*
            $(#[$attr])*
            pub $param : $type,
        ) (
            $($getters)*
        ));
    );
    ( $name:ident { $( $rest:tt)* } ) => {
        serializable_record!(@ $name { $($rest)* } -> () ());
    };
}
