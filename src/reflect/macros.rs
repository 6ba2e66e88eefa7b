//! `record!`: declare a struct together with its `Record` and `Field` impls.

/// Declares a struct and implements [`Record`](crate::reflect::Record) and
/// [`Field`](crate::reflect::Field) for it.
///
/// Each field may carry an annotation string after `=`. Capabilities the type
/// registers go in brackets after the name; every listed capability needs the
/// matching trait impl (`string_id` → `VertexIdStr`, `int64_id` →
/// `VertexIdInt64`, `tag` → `TagNamer`, `edge_type` → `EdgeTypeNamer`).
///
/// ```
/// use norm::record;
/// use norm::reflect::{TagNamer, VertexIdStr};
///
/// record! {
///     #[derive(Debug, Default, Clone, PartialEq)]
///     pub struct Player [string_id, tag] {
///         pub vid: String = "vertex_id",
///         pub name: String,
///         pub age: i64 = "not_null;index",
///     }
/// }
///
/// impl VertexIdStr for Player {
///     fn vertex_id(&self) -> String { self.vid.clone() }
/// }
///
/// impl TagNamer for Player {
///     fn tag_name() -> String { "player".into() }
/// }
/// ```
///
/// The struct must implement `Default`: a NULL scanned into a record field
/// resets it to its default.
#[macro_export]
macro_rules! record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident $([$($cap:ident),* $(,)?])? {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $ty:ty $(= $ann:literal)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $field: $ty,
            )*
        }

        impl $crate::reflect::Record for $name {
            fn fields() -> ::std::vec::Vec<$crate::reflect::FieldDecl> {
                ::std::vec![$(
                    $crate::reflect::FieldDecl::new(
                        ::core::stringify!($field),
                        <$ty as $crate::reflect::Field>::shape(),
                        $crate::__annotation!($($ann)?),
                    ),
                )*]
            }

            fn capabilities() -> $crate::reflect::Capabilities {
                $crate::reflect::Capabilities::new() $($( .$cap::<Self>() )*)?
            }

            fn record_type(&self) -> $crate::reflect::RecordType {
                $crate::reflect::RecordType::of::<Self>()
            }

            fn field(&self, index: usize) -> ::core::option::Option<&dyn $crate::reflect::Field> {
                let fields: [&dyn $crate::reflect::Field; 0 $(+ $crate::__one!($field))*] = [$(&self.$field),*];
                fields.get(index).copied()
            }

            fn field_mut(&mut self, index: usize) -> ::core::option::Option<&mut dyn $crate::reflect::Field> {
                let fields: [&mut dyn $crate::reflect::Field; 0 $(+ $crate::__one!($field))*] = [$(&mut self.$field),*];
                fields.into_iter().nth(index)
            }
        }

        impl $crate::reflect::Field for $name {
            fn shape() -> $crate::reflect::Shape {
                $crate::reflect::Shape::Record($crate::reflect::RecordType::of::<Self>())
            }

            fn as_native(&self) -> $crate::reflect::Native<'_> {
                $crate::reflect::Native::Record(self)
            }

            fn as_dest(&mut self) -> $crate::reflect::Dest<'_> {
                $crate::reflect::Dest::Record(self)
            }

            fn reset(&mut self) {
                *self = ::core::default::Default::default();
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __annotation {
    () => { "" };
    ($ann:literal) => { $ann };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __one {
    ($t:tt) => { 1usize };
}
