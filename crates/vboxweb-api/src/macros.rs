//! Declarative generators for the repetitive parts of the bindings.

/// Declare request/response pairs for remote operations.
///
/// ```ignore
/// operations! {
///     "IVirtualBox_findMachine" => IVirtualBoxFindMachine {
///         this: String = "_this",
///         name_or_id: String = "nameOrId",
///     } -> IVirtualBoxFindMachineResponse {
///         returnval: String = "returnval",
///     }
/// }
/// ```
///
/// Every response field is `#[serde(default)]`: gSOAP omits empty strings
/// and empty arrays.
macro_rules! operations {
    ($(
        $(#[$doc:meta])*
        $op:literal => $req:ident {
            $($field:ident : $fty:ty = $wire:literal),* $(,)?
        } -> $resp:ident {
            $($rfield:ident : $rty:ty = $rwire:literal),* $(,)?
        }
    )*) => {
        $(
            $(#[$doc])*
            #[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
            pub struct $req {
                $(
                    #[serde(rename = $wire)]
                    pub $field: $fty,
                )*
            }

            #[doc = concat!("Response to `", $op, "`.")]
            #[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
            pub struct $resp {
                $(
                    #[serde(rename = $rwire, default)]
                    pub $rfield: $rty,
                )*
            }

            impl vboxweb_soap::SoapRequest for $req {
                const OPERATION: &'static str = $op;
                type Response = $resp;
            }
        )*

        /// Element names of every operation declared in this module.
        pub const OPERATIONS: &[&str] = &[$($op),*];
    };
}

/// Handle type for a server-side managed object (`_this` reference).
macro_rules! managed_object {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone)]
        pub struct $name {
            client: std::sync::Arc<vboxweb_soap::SoapClient>,
            reference: String,
        }

        impl $name {
            pub fn new(
                client: std::sync::Arc<vboxweb_soap::SoapClient>,
                reference: impl Into<String>,
            ) -> Self {
                Self {
                    client,
                    reference: reference.into(),
                }
            }

            /// Opaque managed object reference issued by the server.
            pub fn reference(&self) -> &str {
                &self.reference
            }

            pub fn client(&self) -> &std::sync::Arc<vboxweb_soap::SoapClient> {
                &self.client
            }

            /// The server uses an empty reference for "no object".
            pub fn is_null(&self) -> bool {
                self.reference.is_empty()
            }

            fn this(&self) -> String {
                self.reference.clone()
            }

            /// Tell the server this reference is no longer needed.
            pub async fn release(&self) -> $crate::error::ApiResult<()> {
                self.client
                    .call(&$crate::operations::IManagedObjectRefRelease { this: self.this() })
                    .await?;
                Ok(())
            }
        }
    };
}

/// String-valued API enumeration. Unknown wire values are kept in `Other`.
macro_rules! wire_enum {
    (
        $(#[$doc:meta])*
        $name:ident {
            $($(#[$vdoc:meta])* $variant:ident = $wire:literal),* $(,)?
        }
    ) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vdoc])* $variant,)*
            #[doc = "A value this client does not know about."]
            Other(String),
        }

        impl $name {
            /// Wire name.
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $wire,)*
                    Self::Other(s) => s.as_str(),
                }
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                match s {
                    $($wire => Self::$variant,)*
                    other => Self::Other(other.to_string()),
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::convert::Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self::from(s))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = <String as serde::Deserialize>::deserialize(deserializer)?;
                Ok(Self::from(s.as_str()))
            }
        }
    };
}
