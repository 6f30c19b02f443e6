pub mod company;
pub mod product;
pub mod recommendation;
