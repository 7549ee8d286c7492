//! Widget extension records
//!
//! A specialized widget keeps its state in an extension attached to its
//! node. A widget built on top of another widget embeds the ancestor's
//! extension and reports it through [`Extension::ancestor`], so code written
//! for the ancestor keeps finding its own record:
//!
//! ```
//! use kiln_core::{ext, impl_extension, Extension};
//!
//! struct ListExt { items: usize }
//! impl_extension!(ListExt);
//!
//! struct MenuExt { list: ListExt, open: bool }
//! impl_extension!(MenuExt => list);
//!
//! let menu = MenuExt { list: ListExt { items: 3 }, open: false };
//! let as_list: &ListExt = ext::downcast_ref(&menu).unwrap();
//! assert_eq!(as_list.items, 3);
//! ```

use std::any::Any;

/// Trait for widget-specific node state
///
/// Implement it with [`impl_extension!`](crate::impl_extension).
pub trait Extension: Any {
    /// Get self as Any for downcasting
    fn as_any(&self) -> &dyn Any;

    /// Get self as mutable Any for downcasting
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Convert into an owned Any for by-value downcasting
    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    /// The embedded extension of the ancestor widget, if any
    fn ancestor(&self) -> Option<&(dyn Extension + 'static)> {
        None
    }

    /// Mutable access to the embedded ancestor extension
    fn ancestor_mut(&mut self) -> Option<&mut (dyn Extension + 'static)> {
        None
    }
}

/// Implement [`Extension`] for a type, optionally naming the field that
/// holds the ancestor widget's extension
#[macro_export]
macro_rules! impl_extension {
    ($ty:ty) => {
        impl $crate::ext::Extension for $ty {
            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }
            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }
            fn into_any(self: Box<Self>) -> Box<dyn ::std::any::Any> {
                self
            }
        }
    };
    ($ty:ty => $field:ident) => {
        impl $crate::ext::Extension for $ty {
            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }
            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }
            fn into_any(self: Box<Self>) -> Box<dyn ::std::any::Any> {
                self
            }
            fn ancestor(&self) -> Option<&(dyn $crate::ext::Extension + 'static)> {
                Some(&self.$field)
            }
            fn ancestor_mut(&mut self) -> Option<&mut (dyn $crate::ext::Extension + 'static)> {
                Some(&mut self.$field)
            }
        }
    };
}

/// Find `T` in an extension or any of its embedded ancestors
pub fn downcast_ref<'a, T: Extension>(ext: &'a (dyn Extension + 'static)) -> Option<&'a T> {
    let mut cur = Some(ext);
    while let Some(e) = cur {
        if let Some(t) = e.as_any().downcast_ref::<T>() {
            return Some(t);
        }
        cur = e.ancestor();
    }
    None
}

/// Mutable variant of [`downcast_ref`]
pub fn downcast_mut<'a, T: Extension>(ext: &'a mut (dyn Extension + 'static)) -> Option<&'a mut T> {
    if ext.as_any().is::<T>() {
        return ext.as_any_mut().downcast_mut::<T>();
    }
    match ext.ancestor_mut() {
        Some(ancestor) => downcast_mut::<T>(ancestor),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct BaseExt {
        value: u32,
    }
    crate::impl_extension!(BaseExt);

    #[derive(Debug, PartialEq)]
    struct DerivedExt {
        base: BaseExt,
        extra: bool,
    }
    crate::impl_extension!(DerivedExt => base);

    #[test]
    fn test_downcast_through_ancestor() {
        let mut ext: Box<dyn Extension> = Box::new(DerivedExt {
            base: BaseExt { value: 7 },
            extra: true,
        });
        assert_eq!(downcast_ref::<BaseExt>(ext.as_ref()).map(|b| b.value), Some(7));
        assert!(downcast_ref::<DerivedExt>(ext.as_ref()).unwrap().extra);

        downcast_mut::<BaseExt>(ext.as_mut()).unwrap().value = 9;
        assert_eq!(downcast_ref::<BaseExt>(ext.as_ref()).unwrap().value, 9);
    }

    #[test]
    fn test_downcast_to_unrelated_type_fails() {
        let ext: Box<dyn Extension> = Box::new(BaseExt { value: 1 });
        assert!(downcast_ref::<DerivedExt>(ext.as_ref()).is_none());
    }
}
