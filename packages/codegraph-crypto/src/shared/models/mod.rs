//! Shared models

mod call_site;
mod object_view;
mod value;

pub use call_site::{
    BindingSlot, CallSiteBinding, CallSiteId, CalledMethod, ObjectId, ObservedCall,
};
pub use object_view::ObjectView;
pub use value::{ConstValue, ExtractedValue, ValueFact, ValueId};
