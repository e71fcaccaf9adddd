/// Generate `as_str`, `parse`, `Display`, `FromStr`, `From<T> for String` and
/// `TryFrom<String> for T` for a closed token enum.
///
/// Unknown tokens are an error value (never a fallback variant). Add
/// `#[serde(into = "String", try_from = "String")]` to the enum to serialize it
/// through its token.
macro_rules! token_enum {
    ($name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $str,)+
                }
            }

            /// Look up a variant by its token.
            pub fn parse(token: &str) -> Option<Self> {
                match token {
                    $($str => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $name::parse(s).ok_or_else(|| format!("unknown {}: {s}", stringify!($name)))
            }
        }

        impl From<$name> for String {
            fn from(v: $name) -> Self {
                v.as_str().to_string()
            }
        }

        impl TryFrom<String> for $name {
            type Error = String;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                s.parse()
            }
        }
    };
}
