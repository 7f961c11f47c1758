/*
 * Typestate Infrastructure
 *
 * Subtype oracle backed by an explicit class hierarchy.
 */

mod class_hierarchy;

pub use class_hierarchy::ClassHierarchy;
