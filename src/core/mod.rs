// ─── Vanilla Setup Core ───
// Instance configuration engine behind the "create instance" screen.
//
// Architecture:
//   core/
//     version/  : Mojang manifest, channel filter, filtered version rows
//     instance/ : Loader types, selection + derived name/description, install requests
//     loaders/  : Loader version catalogs (batched GraphQL, direct metas) + resolver
//     state/    : Launcher policy, settings signal, enablement, the setup session

pub mod error;
pub mod http;
pub mod instance;
pub mod loaders;
pub mod state;
pub mod version;

#[cfg(test)]
pub(crate) mod testing;
