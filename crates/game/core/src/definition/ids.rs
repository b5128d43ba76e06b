use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(
    /// Identifier of an authored macrogame.
    MacrogameId
);

string_id!(
    /// Identifier of a base microgame in the microgame catalog.
    MicrogameId
);

string_id!(
    /// Identifier of a custom skin variant of a microgame.
    VariantId
);

string_id!(
    /// Identifier of a trackable in-game event (e.g. `"win"`, `"coin_collected"`).
    EventId
);

string_id!(
    /// Identifier of a method instance, unique within its conversion screen.
    InstanceId
);

string_id!(
    /// Identifier of a conversion method record in the method catalog.
    MethodId
);

string_id!(
    /// Identifier of a conversion screen.
    ConversionScreenId
);
