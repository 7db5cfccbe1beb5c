//! Wrapper functions and completions for bash, zsh and fish
//!
//! The generated `mpm` function shadows the binary. It evals the `cd`
//! directive printed by `mpm go`, and after `mpm i` it sources and removes
//! the side-channel file before evaluating any directive the session printed.

use mpm_utils::shell_quote;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

const SIDE_CHANNEL_PLACEHOLDER: &str = "__MPM_CD_FILE__";

/// Supported shell types
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ShellType {
    Bash,
    Zsh,
    Fish,
}

impl FromStr for ShellType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bash" => Ok(ShellType::Bash),
            "zsh" => Ok(ShellType::Zsh),
            "fish" => Ok(ShellType::Fish),
            other => Err(anyhow::anyhow!("Unsupported shell: {}", other)),
        }
    }
}

impl fmt::Display for ShellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShellType::Bash => write!(f, "bash"),
            ShellType::Zsh => write!(f, "zsh"),
            ShellType::Fish => write!(f, "fish"),
        }
    }
}

/// Generate the shell init script, wired to the given side-channel file
pub fn generate_init_script(shell: ShellType, side_channel: &Path) -> String {
    let template = match shell {
        ShellType::Bash => BASH_INIT,
        ShellType::Zsh => ZSH_INIT,
        ShellType::Fish => FISH_INIT,
    };
    template.replace(
        SIDE_CHANNEL_PLACEHOLDER,
        &shell_quote(&side_channel.to_string_lossy()),
    )
}

const BASH_INIT: &str = r#"# mpm shell integration for bash
# Add to ~/.bashrc:  eval "$(command mpm init bash)"

mpm() {
    local out status cd_file=__MPM_CD_FILE__
    case "$1" in
        go)
            out="$(command mpm "$@")"
            status=$?
            case "$out" in
                "cd "*) eval "$out" ;;
                *) [ -n "$out" ] && printf '%s\n' "$out" ;;
            esac
            return $status
            ;;
        i)
            rm -f "$cd_file"
            out="$(command mpm "$@")"
            status=$?
            if [ -f "$cd_file" ]; then
                . "$cd_file"
                rm -f "$cd_file"
            fi
            [ -n "$out" ] && eval "$out"
            return $status
            ;;
        *)
            command mpm "$@"
            ;;
    esac
}

_mpm_completions() {
    local cur="${COMP_WORDS[COMP_CWORD]}"
    if [ "$COMP_CWORD" -eq 1 ]; then
        COMPREPLY=( $(compgen -W "add remove list go i init" -- "$cur") )
    elif [ "$COMP_CWORD" -eq 2 ]; then
        case "${COMP_WORDS[1]}" in
            go|remove)
                COMPREPLY=( $(compgen -W "$(command mpm list --format names 2>/dev/null)" -- "$cur") )
                ;;
        esac
    fi
}

complete -F _mpm_completions mpm
"#;

const ZSH_INIT: &str = r#"# mpm shell integration for zsh
# Add to ~/.zshrc:  eval "$(command mpm init zsh)"

mpm() {
    local out exit_code cd_file=__MPM_CD_FILE__
    case "$1" in
        go)
            out="$(command mpm "$@")"
            exit_code=$?
            if [[ "$out" == "cd "* ]]; then
                eval "$out"
            elif [[ -n "$out" ]]; then
                print -r -- "$out"
            fi
            return $exit_code
            ;;
        i)
            rm -f "$cd_file"
            out="$(command mpm "$@")"
            exit_code=$?
            if [[ -f "$cd_file" ]]; then
                source "$cd_file"
                rm -f "$cd_file"
            fi
            [[ -n "$out" ]] && eval "$out"
            return $exit_code
            ;;
        *)
            command mpm "$@"
            ;;
    esac
}

_mpm() {
    if (( CURRENT == 2 )); then
        compadd add remove list go i init
    elif (( CURRENT == 3 )) && [[ "${words[2]}" == (go|remove) ]]; then
        compadd ${(f)"$(command mpm list --format names 2>/dev/null)"}
    fi
}

compdef _mpm mpm
"#;

const FISH_INIT: &str = r#"# mpm shell integration for fish
# Add to ~/.config/fish/config.fish:  command mpm init fish | source

function mpm
    set -l cd_file __MPM_CD_FILE__
    switch "$argv[1]"
        case go
            set -l out (command mpm $argv)
            set -l code $status
            if string match -q 'cd *' -- "$out"
                eval $out
            else if test -n "$out"
                printf '%s\n' $out
            end
            return $code
        case i
            rm -f $cd_file
            set -l out (command mpm $argv)
            set -l code $status
            if test -f $cd_file
                source $cd_file
                rm -f $cd_file
            end
            if test -n "$out"
                eval $out
            end
            return $code
        case '*'
            command mpm $argv
    end
end

complete -c mpm -f -n '__fish_use_subcommand' -a 'add remove list go i init'
complete -c mpm -f -n '__fish_seen_subcommand_from go remove' -a '(command mpm list --format names 2>/dev/null)'
"#;
