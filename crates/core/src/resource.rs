//! The contract every backend record type implements.
//!
//! One `Resource` impl replaces the hand-written per-module service and
//! list-component boilerplate: the client crate builds a generic service and
//! list screen on top of these constants.

use serde::de::DeserializeOwned;

use crate::id::RecordId;

/// Label rendered for status values the client does not know yet.
pub const UNKNOWN_LABEL: &str = "غير معروف";

/// A value with a wire code and a localized (Arabic) display label.
pub trait Labeled {
    /// Wire value as sent by the backend.
    fn code(&self) -> &str;

    /// Display text shown to the user.
    fn label(&self) -> &str;
}

/// A backend record family served under one collection path.
pub trait Resource: DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection path relative to the API root, e.g. `/cases`.
    const PATH: &'static str;

    /// Key some list endpoints use for the row array instead of `items`
    /// (e.g. `users`).
    const COLLECTION_KEY: &'static str;

    /// Singular noun, with article, used in delete prompts and messages
    /// (e.g. `المستخدم`).
    const LABEL: &'static str;

    /// Plural noun used when a whole page fails to load (e.g. `المستخدمين`).
    const PLURAL_LABEL: &'static str;

    fn id(&self) -> &RecordId;

    /// Human-readable name of one row (title, full name, number...).
    fn display_name(&self) -> String;

    /// Localized status text for list rendering, when the record has one.
    fn status_label(&self) -> Option<&str> {
        None
    }

    fn item_path(id: &RecordId) -> String {
        format!("{}/{}", Self::PATH, id)
    }
}

/// Declare a status enum with wire codes, Arabic labels and a forward
/// compatible `Unknown` variant.
///
/// ```ignore
/// adala_core::labeled_status! {
///     /// Lifecycle of a client record.
///     pub enum ClientStatus {
///         Active => ("active", "نشط"),
///         Inactive => ("inactive", "غير نشط"),
///     }
/// }
/// ```
#[macro_export]
macro_rules! labeled_status {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => ($code:literal, $label:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $code)]
                $variant,
            )+
            /// A value introduced by the backend after this client was built.
            #[serde(rename = "unknown", other)]
            Unknown,
        }

        impl $name {
            /// Every known variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $code,)+
                    $name::Unknown => "unknown",
                }
            }

            pub fn parse(code: &str) -> Option<Self> {
                match code {
                    $($code => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl $crate::resource::Labeled for $name {
            fn code(&self) -> &str {
                self.as_str()
            }

            fn label(&self) -> &str {
                match self {
                    $($name::$variant => $label,)+
                    $name::Unknown => $crate::resource::UNKNOWN_LABEL,
                }
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::labeled_status! {
        enum Sample {
            Open => ("open", "مفتوح"),
            Closed => ("closed", "مغلق"),
        }
    }

    #[test]
    fn known_codes_round_trip_with_labels() {
        let open: Sample = serde_json::from_str("\"open\"").unwrap();
        assert_eq!(open, Sample::Open);
        assert_eq!(open.label(), "مفتوح");
        assert_eq!(serde_json::to_string(&Sample::Closed).unwrap(), "\"closed\"");
        assert_eq!(Sample::parse("closed"), Some(Sample::Closed));
        assert_eq!(Sample::ALL.len(), 2);
    }

    #[test]
    fn unknown_codes_fall_back() {
        let later: Sample = serde_json::from_str("\"archived\"").unwrap();
        assert_eq!(later, Sample::Unknown);
        assert_eq!(later.label(), UNKNOWN_LABEL);
        assert_eq!(Sample::parse("archived"), None);
    }
}
