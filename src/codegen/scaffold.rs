//! Project scaffold templates: build/type/CSS configuration, entry points,
//! stylesheet, shared types, and the client-side persistence hook.

pub(super) fn vite_config() -> String {
    r#"import { defineConfig } from 'vite'
import react from '@vitejs/plugin-react'

export default defineConfig({
  plugins: [react()],
})
"#
    .to_string()
}

pub(super) fn tsconfig() -> String {
    r#"{
  "compilerOptions": {
    "target": "ES2020",
    "useDefineForClassFields": true,
    "lib": ["ES2020", "DOM", "DOM.Iterable"],
    "module": "ESNext",
    "skipLibCheck": true,
    "moduleResolution": "bundler",
    "allowImportingTsExtensions": true,
    "resolveJsonModule": true,
    "isolatedModules": true,
    "noEmit": true,
    "jsx": "react-jsx",
    "strict": true,
    "noUnusedLocals": true,
    "noUnusedParameters": true,
    "noFallthroughCasesInSwitch": true
  },
  "include": ["src"]
}
"#
    .to_string()
}

pub(super) fn tailwind_config() -> String {
    r#"/** @type {import('tailwindcss').Config} */
export default {
  content: ['./index.html', './src/**/*.{ts,tsx}'],
  darkMode: 'class',
  theme: {
    extend: {},
  },
  plugins: [],
}
"#
    .to_string()
}

pub(super) fn index_html(project_name: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0" />
    <title>{}</title>
  </head>
  <body>
    <div id="root"></div>
    <script type="module" src="/src/main.tsx"></script>
  </body>
</html>
"#,
        project_name
    )
}

pub(super) fn main_entry() -> String {
    r#"import React from 'react'
import ReactDOM from 'react-dom/client'
import App from './App'
import './index.css'

ReactDOM.createRoot(document.getElementById('root')!).render(
  <React.StrictMode>
    <App />
  </React.StrictMode>,
)
"#
    .to_string()
}

pub(super) fn global_stylesheet() -> String {
    r#"@tailwind base;
@tailwind components;
@tailwind utilities;

body {
  font-family: system-ui, -apple-system, sans-serif;
  line-height: 1.6;
}
"#
    .to_string()
}

pub(super) fn types_definition() -> String {
    r#"export type ItemStatus = 'in-progress' | 'todo' | 'done'

export type ItemPriority = 'high' | 'medium' | 'low'

export interface Item {
  id: string
  title: string
  description: string
  status: ItemStatus
  priority: ItemPriority
  createdAt: string
}
"#
    .to_string()
}

pub(super) fn persistence_hook() -> String {
    r#"import { useEffect, useState } from 'react'

export function useLocalStorage<T>(key: string, initialValue: T) {
  const [value, setValue] = useState<T>(() => {
    try {
      const stored = window.localStorage.getItem(key)
      return stored !== null ? (JSON.parse(stored) as T) : initialValue
    } catch {
      return initialValue
    }
  })

  useEffect(() => {
    try {
      window.localStorage.setItem(key, JSON.stringify(value))
    } catch {
      // Storage may be unavailable (private browsing, quota); state still works
    }
  }, [key, value])

  return [value, setValue] as const
}
"#
    .to_string()
}

pub(super) fn backend_entry(project_name: &str) -> String {
    format!(
        r#"import express from 'express'
import cors from 'cors'

const app = express()
const port = process.env.PORT || 3001

app.use(cors())
app.use(express.json())

app.get('/api/health', (_req, res) => {{
  res.json({{ status: 'ok', service: '{}' }})
}})

app.listen(port, () => {{
  console.log(`API server listening on port ${{port}}`)
}})
"#,
        project_name
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_html_embeds_title() {
        let html = index_html("My App");
        assert!(html.contains("<title>My App</title>"));
        assert!(html.contains("src/main.tsx"));
    }

    #[test]
    fn test_tailwind_uses_class_dark_mode() {
        // The header's dark-mode toggle flips a class on <html>
        assert!(tailwind_config().contains("darkMode: 'class'"));
    }

    #[test]
    fn test_types_cover_sort_keys() {
        let types = types_definition();
        assert!(types.contains("'in-progress' | 'todo' | 'done'"));
        assert!(types.contains("'high' | 'medium' | 'low'"));
    }

    #[test]
    fn test_backend_entry_embeds_name() {
        assert!(backend_entry("orders").contains("service: 'orders'"));
    }
}
