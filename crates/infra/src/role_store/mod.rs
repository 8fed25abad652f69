//! `RoleStore` adapters.
//!
//! - `in_memory`: process-local profiles for dev/tests
//! - `supabase`: the `profiles` table behind Supabase's PostgREST API

pub mod in_memory;
pub mod supabase;

pub use in_memory::InMemoryRoleStore;
pub use supabase::SupabaseRoleStore;
