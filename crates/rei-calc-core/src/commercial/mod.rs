pub mod multifamily;
