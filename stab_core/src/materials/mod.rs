//! # Materials
//!
//! Material definitions for precast girders. Concrete is the only structural
//! material the stability checks need; prestressing steel enters through the
//! effective prestress forces in [`crate::strands`].

pub mod concrete;

pub use concrete::{
    density_modification_factor, modulus_of_elasticity, resolve, Concrete, ConcreteType,
    ModulusFactors, ResolvedConcrete,
};
