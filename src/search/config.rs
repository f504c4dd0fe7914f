use crate::core::Mark;

/// Configuração da busca (equivalente às opções UCI do motor).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Marca cujo score a busca maximiza.
    pub maximizer: Mark,
    /// Tabuleiro vazio: usa o atalho de abertura em vez da busca completa.
    pub opening_shortcut: bool,
    /// Avalia os lances da raiz em paralelo (rayon).
    pub parallel_root: bool,
    /// Threads do pool da busca paralela.
    pub threads: usize,
    /// Capacidade inicial da TT.
    pub cache_capacity: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            maximizer: Mark::O,
            opening_shortcut: true,
            parallel_root: false,
            threads: num_cpus::get().max(1),
            cache_capacity: 8192,
        }
    }
}
