//! Helper macro for port error enums.

/// Declare a port error enum plus snake-case constructor helpers.
///
/// Adapters build variants through the helpers so call sites take
/// `impl Into<_>` arguments instead of spelling out struct literals.
macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident { $($field:ident : $ty:ty),+ $(,)? } => $message:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant { $($field : $ty),+ },
            )+
        }

        ::paste::paste! {
            impl $name {
                $(
                    pub fn [<$variant:snake>]($($field: impl ::core::convert::Into<$ty>),+) -> Self {
                        Self::$variant { $($field: $field.into()),+ }
                    }
                )+
            }
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    define_port_error! {
        /// Example error for the expansion tests.
        pub enum SampleError {
            /// Transport broke.
            Broken { message: String } => "broken: {message}",
            /// Mixed field types survive the helper.
            Slow { message: String, millis: u64 } => "slow after {millis}ms: {message}",
        }
    }

    #[test]
    fn helpers_accept_into_arguments() {
        let err = SampleError::broken("cable unplugged");
        assert_eq!(err.to_string(), "broken: cable unplugged");
    }

    #[test]
    fn helpers_keep_non_string_fields() {
        let err = SampleError::slow("queue full", 1500_u64);
        assert_eq!(err.to_string(), "slow after 1500ms: queue full");
    }
}
